use httpmock::prelude::*;
use sercop_dash::{DashboardEngine, DashboardError, SercopClient};

fn records(n: usize, year: u16) -> serde_json::Value {
    serde_json::Value::Array(
        (0..n)
            .map(|i| serde_json::json!({"code": format!("P-{}-{}", year, i), "year": "upstream"}))
            .collect(),
    )
}

fn year_mock(server: &MockServer, year: u16, n: usize) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/get_analysis")
            .query_param("local", "1")
            .query_param("year", year.to_string());
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(records(n, year));
    })
}

#[tokio::test]
async fn test_one_get_per_year_and_empty_years_stay_absent() {
    let server = MockServer::start();

    // 2020 answers with an empty array, every other year with data
    let mocks: Vec<_> = (2015..=2025)
        .map(|year| {
            let n = match year {
                2015 => 3,
                2018 => 2,
                2020 => 0,
                _ => 1,
            };
            year_mock(&server, year, n)
        })
        .collect();

    let client = SercopClient::new(&server.base_url()).unwrap();
    let engine = DashboardEngine::new(client, 5);

    let view = engine.historical_section().await.unwrap();

    for mock in &mocks {
        mock.assert();
    }
    let points: Vec<(u16, u64)> = view.series.points().iter().map(|p| (p.year, p.count)).collect();
    assert_eq!(
        points,
        vec![
            (2015, 3),
            (2016, 1),
            (2017, 1),
            (2018, 2),
            (2019, 1),
            (2021, 1),
            (2022, 1),
            (2023, 1),
            (2024, 1),
            (2025, 1),
        ]
    );
    assert!(view.failed_years.is_empty());
}

#[tokio::test]
async fn test_failed_years_are_skipped_but_lenient_bodies_are_not_failures() {
    let server = MockServer::start();

    let mut mocks = Vec::new();
    for year in 2015..=2025 {
        match year {
            // A hard failure: the year lands in failed_years
            2016 => {
                mocks.push(server.mock(|when, then| {
                    when.method(GET)
                        .path("/get_analysis")
                        .query_param("year", "2016");
                    then.status(500);
                }));
            }
            // A junk body: tolerated as "no data", not a failure
            2019 => {
                mocks.push(server.mock(|when, then| {
                    when.method(GET)
                        .path("/get_analysis")
                        .query_param("year", "2019");
                    then.status(200).body("<html>service moved</html>");
                }));
            }
            _ => mocks.push(year_mock(&server, year, 1)),
        }
    }

    let client = SercopClient::new(&server.base_url()).unwrap();
    let engine = DashboardEngine::new(client, 5);

    let view = engine.historical_section().await.unwrap();

    for mock in &mocks {
        mock.assert();
    }
    let years: Vec<u16> = view.series.points().iter().map(|p| p.year).collect();
    assert_eq!(years, vec![2015, 2017, 2018, 2020, 2021, 2022, 2023, 2024, 2025]);
    assert_eq!(view.failed_years, vec![2016]);
}

#[tokio::test]
async fn test_every_year_empty_means_no_historical_data() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/get_analysis");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([]));
    });

    let client = SercopClient::new(&server.base_url()).unwrap();
    let engine = DashboardEngine::new(client, 5);

    let err = engine.historical_section().await.unwrap_err();

    // The loop still visited all eleven years before giving up
    assert_eq!(api_mock.hits(), 11);
    assert!(matches!(err, DashboardError::HistoricalEmpty));
}

#[tokio::test]
async fn test_every_year_failing_means_no_historical_data() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/get_analysis");
        then.status(502);
    });

    let client = SercopClient::new(&server.base_url()).unwrap();
    let engine = DashboardEngine::new(client, 5);

    let err = engine.historical_section().await.unwrap_err();

    assert_eq!(api_mock.hits(), 11);
    assert!(matches!(err, DashboardError::HistoricalEmpty));

    let view_err = format!("{}", err);
    assert!(view_err.contains("historical"));
}

#[tokio::test]
async fn test_upstream_year_fields_do_not_leak_into_the_trend() {
    let server = MockServer::start();

    // Every record claims a bogus year; the loop's own stamping must win
    let mocks: Vec<_> = (2015..=2025)
        .map(|year| {
            server.mock(|when, then| {
                when.method(GET)
                    .path("/get_analysis")
                    .query_param("year", year.to_string());
                then.status(200)
                    .json_body(serde_json::json!([{"code": "X", "year": 1999}]));
            })
        })
        .collect();

    let client = SercopClient::new(&server.base_url()).unwrap();
    let engine = DashboardEngine::new(client, 5);

    let view = engine.historical_section().await.unwrap();

    for mock in &mocks {
        mock.assert();
    }
    let years: Vec<u16> = view.series.points().iter().map(|p| p.year).collect();
    assert_eq!(years, (2015..=2025).collect::<Vec<u16>>());
    assert!(view.series.points().iter().all(|p| p.count == 1));
}
