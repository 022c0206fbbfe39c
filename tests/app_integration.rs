use std::fs;
use std::sync::Arc;
use tracing::{error, info};

use kantor::core::config::NbpProviderConfig;
use kantor::core::state::AppState;
use kantor::core::{RateSource, Session};
use kantor::providers::nbp::NbpProvider;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const TABLE_RESPONSE: &str = r#"[{
        "table": "A",
        "no": "001/A/NBP/2024",
        "effectiveDate": "2024-01-02",
        "rates": [
            {"currency": "dolar amerykański", "code": "USD", "mid": 4.00},
            {"currency": "euro", "code": "EUR", "mid": 4.30}
        ]
    }]"#;

    pub fn history_response(code: &str, mids: &[(&str, f64)]) -> String {
        let rates: Vec<String> = mids
            .iter()
            .enumerate()
            .map(|(i, (date, mid))| {
                format!(r#"{{"no": "{:03}/A/NBP/2024", "effectiveDate": "{date}", "mid": {mid}}}"#, i + 1)
            })
            .collect();
        format!(
            r#"{{"table": "A", "currency": "x", "code": "{code}", "rates": [{}]}}"#,
            rates.join(",")
        )
    }

    pub async fn create_nbp_mock_server() -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/exchangerates/tables/A/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TABLE_RESPONSE))
            .mount(&mock_server)
            .await;

        for (code, mids) in [
            ("usd", [("2024-01-01", 4.00), ("2024-01-02", 4.02)]),
            ("eur", [("2024-01-01", 4.31), ("2024-01-02", 4.30)]),
        ] {
            Mock::given(method("GET"))
                .and(path(format!("/api/exchangerates/rates/A/{code}/last/30/")))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string(history_response(&code.to_uppercase(), &mids)),
                )
                .mount(&mock_server)
                .await;
        }

        mock_server
    }

    pub fn write_config(base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
            providers:
              nbp:
                base_url: {base_url}
                timeout_secs: 2
                retries: 0
            amount: "100"
        "#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

fn provider(base_url: &str) -> Arc<NbpProvider> {
    Arc::new(
        NbpProvider::new(&NbpProviderConfig {
            base_url: base_url.to_string(),
            timeout_secs: 2,
            retries: 0,
        })
        .expect("Failed to build provider"),
    )
}

#[test_log::test(tokio::test)]
async fn test_full_convert_flow_with_mock() {
    let mock_server = test_utils::create_nbp_mock_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = kantor::run_command(
        kantor::AppCommand::Convert {
            amount: "100".into(),
            from: "PLN".into(),
            to: "USD".into(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Convert command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_random_and_rates_flow_with_mock() {
    let mock_server = test_utils::create_nbp_mock_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());
    let config_path = config_file.path().to_str().unwrap();

    for command in [
        kantor::AppCommand::Rates,
        kantor::AppCommand::Random { amount: None },
    ] {
        let result = kantor::run_command(command.clone(), Some(config_path)).await;
        assert!(result.is_ok(), "{command:?} failed with: {:?}", result.err());
    }
}

#[test_log::test(tokio::test)]
async fn test_unreachable_api_is_reported() {
    let mock_server = wiremock::MockServer::start().await;
    let config_file = test_utils::write_config(&mock_server.uri());

    // No mocks mounted: every request gets a 404.
    let result = kantor::run_command(
        kantor::AppCommand::Rates,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    let err = result.expect_err("Rates should fail without a table");
    assert!(
        err.to_string().starts_with("Could not load exchange rates: HTTP error: 404"),
        "Unexpected error: {err}"
    );
}

#[test_log::test(tokio::test)]
async fn test_session_against_mock_api() {
    let mock_server = test_utils::create_nbp_mock_server().await;
    let mut session = Session::new(provider(&mock_server.uri()), AppState::with_amount("10"));
    session.start();
    session.settle().await;

    session.dispatch(kantor::core::Event::FromSelected("USD".into()));
    session.dispatch(kantor::core::Event::ToSelected("EUR".into()));
    let state = session.settle().await;

    let conversion = state.conversion().expect("Conversion should be available");
    assert!((conversion.converted - 9.3023).abs() < 1e-4);
    assert_eq!(state.history.len(), 2);
    let expected = 4.00 / (4.02 * 4.30);
    assert!((state.history.points()[1].value - expected).abs() < 1e-12);
}

#[test_log::test(tokio::test)]
async fn test_interactive_session_with_scripted_input() {
    let mock_server = test_utils::create_nbp_mock_server().await;
    let mut session = Session::new(provider(&mock_server.uri()), AppState::default());
    session.start();
    session.settle().await;

    let script: &[u8] = b"from USD\nto EUR\namount 10\nbogus\nquit\n";
    let mut out = Vec::new();
    kantor::cli::interactive::run(&mut session, script, &mut out)
        .await
        .expect("Interactive session failed");

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("9.30 EUR"));
    assert!(text.contains("1 USD = 0.9302 EUR"));
    assert!(text.contains("Unknown command: bogus"));
}

#[test_log::test(tokio::test)]
async fn test_setup_writes_loadable_config() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("kantor").join("config.yaml");
    kantor::cli::setup::setup_at_path(&path).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("api.nbp.pl"));
    let config = kantor::load_config(path.to_str()).unwrap();
    assert_eq!(config.providers.nbp.retries, 1);
}

#[test_log::test(tokio::test)]
#[ignore = "hits the live NBP API"]
async fn test_real_nbp_api() {
    let provider = NbpProvider::new(&NbpProviderConfig::default()).unwrap();

    match provider.fetch_table().await {
        Ok(table) => {
            info!(currencies = table.len(), "Received live rate table");
            assert!(table.len() > 10);
            assert!(table.get("USD").is_some());
        }
        Err(e) => {
            error!("Rate table request failed: {e}\n{e:?}");
            panic!("Rate table request failed: {e}");
        }
    }

    match provider.fetch_history("EUR").await {
        Ok(series) => {
            info!(points = series.points.len(), "Received live history");
            assert_eq!(series.code, "EUR");
            assert!(!series.points.is_empty());
            assert!(series.points.windows(2).all(|w| w[0].date <= w[1].date));
        }
        Err(e) => {
            error!("History request failed: {e}\n{e:?}");
            panic!("History request failed: {e}");
        }
    }
}
