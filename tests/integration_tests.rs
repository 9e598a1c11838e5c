use std::io::Cursor;
use std::sync::Arc;

use chrono::{Days, Months, NaiveDate};
use trip_forecast::config::EngineConfig;
use trip_forecast::error::ForecastError;
use trip_forecast::forecast::{ForecastResult, Granularity, forecast};
use trip_forecast::infra::MemoryStore;
use trip_forecast::infra::csv_store::read_csv;
use trip_forecast::observation::Observation;
use trip_forecast::server;
use trip_forecast::services::Forecaster;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()
}

fn daily(zip: &str, counts: &[u64]) -> Vec<Observation> {
    counts
        .iter()
        .enumerate()
        .map(|(i, &c)| Observation::on_date(start() + Days::new(i as u64), zip, c))
        .collect()
}

fn assert_well_formed(result: &ForecastResult) {
    for point in result.points() {
        assert!(point.predicted() >= 0.0, "{point:?}");
        assert!(point.lower_bound() <= point.predicted(), "{point:?}");
        assert!(point.predicted() <= point.upper_bound(), "{point:?}");
    }
    for pair in result.forecast.windows(2) {
        assert!(pair[1].width() >= pair[0].width() - 1e-9);
    }
}

#[test]
fn test_full_pipeline_from_csv() {
    let mut csv = String::from("timestamp,zip_code,count\n");
    for day in 0..21 {
        let date = start() + Days::new(day);
        csv.push_str(&format!("{date},60601,{}\n", 50 + day));
        csv.push_str(&format!("{date}T12:30:00Z,60601,1\n"));
    }

    let observations = read_csv(Cursor::new(csv)).expect("Failed to read CSV");
    let config = EngineConfig::default();
    let result = forecast(&observations, "60601", Granularity::Day, 7, &config).unwrap();

    assert_eq!(result.historical.len(), 21);
    assert_eq!(result.forecast.len(), 7);
    // two rows per day are summed into one bucket
    assert_eq!(result.historical[0].predicted(), 51.0);
    assert_eq!(result.forecast[0].period(), "2021-03-22");
    // daily totals climb 51..=71 by one trip a day
    for (lead, point) in result.forecast.iter().enumerate() {
        let expected = 72.0 + lead as f64;
        assert!(
            (point.predicted() - expected).abs() < 1e-6,
            "lead {}: {}",
            lead + 1,
            point.predicted()
        );
    }
    assert_well_formed(&result);
}

#[test]
fn test_monthly_trend_with_yearly_cycle() {
    let year: [i64; 12] = [-30, -20, -10, 0, 10, 20, 30, 20, 10, 0, -10, -20];
    let first = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
    let observations: Vec<Observation> = (0..36)
        .map(|i| {
            let date = first.checked_add_months(Months::new(i)).unwrap();
            let count = 200 + 3 * i64::from(i) + year[i as usize % 12];
            Observation::on_date(date, "60601", count as u64)
        })
        .collect();

    let result = forecast(
        &observations,
        "60601",
        Granularity::Month,
        12,
        &EngineConfig::default(),
    )
    .unwrap();

    assert_eq!(result.forecast[0].period(), "2021-01");
    for (k, point) in result.forecast.iter().enumerate() {
        let i = 36 + k;
        let expected = 200.0 + 3.0 * i as f64 + year[i % 12] as f64;
        assert!(
            (point.predicted() - expected).abs() < 1e-6,
            "{}: {} vs {expected}",
            point.period(),
            point.predicted()
        );
    }
    assert_well_formed(&result);
}

#[test]
fn test_bounds_hold_across_series() {
    let series: Vec<Vec<u64>> = vec![
        vec![0; 20],
        vec![100; 20],
        (0..40).map(|i| 200 - i * 5).collect(),
        (0..35).map(|i| if i % 7 < 5 { 120 } else { 30 }).collect(),
        vec![1, 0, 9, 0, 0, 14, 2, 0, 30, 1, 0, 0, 7],
    ];
    let config = EngineConfig::default();

    for counts in &series {
        let observations = daily("60601", counts);
        for granularity in Granularity::ALL {
            match forecast(&observations, "60601", granularity, 6, &config) {
                Ok(result) => {
                    assert_eq!(result.forecast.len(), 6);
                    assert_well_formed(&result);
                }
                Err(ForecastError::InsufficientData { .. }) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
    }
}

#[test]
fn test_gaps_count_as_zero_periods() {
    let observations = vec![
        Observation::on_date(start(), "60601", 10),
        Observation::on_date(start() + Days::new(4), "60601", 10),
    ];
    let result = forecast(
        &observations,
        "60601",
        Granularity::Day,
        1,
        &EngineConfig::default(),
    )
    .unwrap();

    let history: Vec<f64> = result.historical.iter().map(|p| p.predicted()).collect();
    assert_eq!(history, vec![10.0, 0.0, 0.0, 0.0, 10.0]);
}

#[tokio::test]
async fn test_http_end_to_end() {
    let mut observations = daily("60601", &[100; 28]);
    observations.push(Observation::on_date(start(), "60614", 4));

    let forecaster = Forecaster::new(
        Arc::new(MemoryStore::new(observations)),
        EngineConfig::default(),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, server::router(forecaster)).await.unwrap();
    });

    let client = reqwest::Client::new();
    let base = format!("http://{addr}");

    let resp = client
        .get(format!("{base}/api/forecast?zip=60601&period=w&horizon=3"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["zip_code"], "60601");
    assert_eq!(body["period"], "w");
    assert_eq!(body["historical"].as_array().unwrap().len(), 4);
    assert_eq!(body["forecast"].as_array().unwrap().len(), 3);
    assert_eq!(body["forecast"][0]["period"], "2021-03-29");

    let cases = [
        ("/api/forecast?zip=99999", 404, "not_found"),
        ("/api/forecast?zip=60614", 422, "insufficient_data"),
        ("/api/forecast?zip=60601&period=q", 400, "invalid_granularity"),
        ("/api/forecast?zip=60601&horizon=0", 400, "invalid_horizon"),
        ("/api/forecast?period=d", 400, "missing_parameter"),
    ];
    for (path, status, kind) in cases {
        let resp = client.get(format!("{base}{path}")).send().await.unwrap();
        assert_eq!(resp.status().as_u16(), status, "{path}");
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["error"]["kind"], kind, "{path}");
        assert!(body["error"]["message"].is_string());
    }

    let health: serde_json::Value = client
        .get(format!("{base}/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["zip_codes"], 2);
}
