mod support;

use support::detect_testkit::{
    import_rows, payment_exists, recurring_payload, recurring_rows, run_scenario, temp_home_in_tmp,
    transaction,
};

#[test]
fn simple_monthly_subscription_is_detected() {
    let rows = vec![
        transaction("acct_1", "2026-01-21", -15.49, "Netflix.com", None),
        transaction("acct_1", "2026-02-20", -15.49, "Netflix.com", None),
        transaction("acct_1", "2026-03-22", -15.49, "Netflix.com", None),
        transaction("acct_1", "2026-04-21", -15.49, "Netflix.com", None),
    ];

    let detected = run_scenario(&rows, "2026-05-01");
    assert_eq!(detected.len(), 1);

    let row = &detected[0];
    assert_eq!(row["label"].as_str(), Some("Netflix.com"));
    assert_eq!(row["cadence"].as_str(), Some("Monthly"));
    assert_eq!(row["average_amount"].as_i64(), Some(15));
    assert_eq!(row["last_date"].as_str(), Some("2026-04-21T00:00:00"));
    assert_eq!(row["next_date"].as_str(), Some("2026-05-21T00:00:00"));
}

#[test]
fn merchant_name_is_preferred_for_the_emitted_label() {
    let rows = vec![
        transaction(
            "acct_1",
            "2026-01-10",
            -9.99,
            "POS DEBIT 4417 SPOTIFY USA",
            Some("Spotify"),
        ),
        transaction(
            "acct_1",
            "2026-02-09",
            -9.99,
            "POS DEBIT 8812 SPOTIFY USA",
            Some("Spotify"),
        ),
        transaction(
            "acct_1",
            "2026-03-11",
            -9.99,
            "POS DEBIT 9203 SPOTIFY USA",
            Some("Spotify"),
        ),
    ];

    let detected = run_scenario(&rows, "2026-03-20");
    assert!(payment_exists(&detected, "Spotify", "Monthly"));
}

#[test]
fn blocklisted_labels_never_produce_payments() {
    let rows = vec![
        transaction("acct_1", "2026-01-05", -100.0, "ATM WITHDRAWAL", None),
        transaction("acct_1", "2026-02-04", -100.0, "ATM WITHDRAWAL", None),
        transaction("acct_1", "2026-03-06", -100.0, "ATM WITHDRAWAL", None),
        transaction("acct_1", "2026-04-05", -100.0, "ATM WITHDRAWAL", None),
    ];

    let detected = run_scenario(&rows, "2026-04-15");
    assert!(detected.is_empty());
}

#[test]
fn two_occurrences_are_insufficient_history() {
    let rows = vec![
        transaction("acct_1", "2026-02-10", -29.0, "Fitness Collective", None),
        transaction("acct_1", "2026-03-12", -29.0, "Fitness Collective", None),
    ];

    let detected = run_scenario(&rows, "2026-04-01");
    assert!(detected.is_empty());
}

#[test]
fn unstable_amounts_fail_the_stability_floor() {
    let rows = vec![
        transaction("acct_1", "2026-01-05", -20.0, "City Utilities Co", None),
        transaction("acct_1", "2026-02-04", -60.0, "City Utilities Co", None),
        transaction("acct_1", "2026-03-06", -100.0, "City Utilities Co", None),
        transaction("acct_1", "2026-04-05", -140.0, "City Utilities Co", None),
    ];

    let detected = run_scenario(&rows, "2026-04-15");
    assert!(detected.is_empty());
}

#[test]
fn mild_amount_variance_still_qualifies() {
    let rows = vec![
        transaction("acct_1", "2026-01-05", -20.0, "Cloud Backup Plan", None),
        transaction("acct_1", "2026-02-04", -20.0, "Cloud Backup Plan", None),
        transaction("acct_1", "2026-03-06", -24.0, "Cloud Backup Plan", None),
        transaction("acct_1", "2026-04-05", -20.0, "Cloud Backup Plan", None),
    ];

    let detected = run_scenario(&rows, "2026-04-15");
    assert_eq!(detected.len(), 1);
    assert_eq!(detected[0]["average_amount"].as_i64(), Some(21));
}

#[test]
fn overdue_series_predicts_a_date_on_or_after_now() {
    let rows = vec![
        transaction("acct_1", "2026-01-23", -55.0, "Insurance Premium Plan", None),
        transaction("acct_1", "2026-02-22", -55.0, "Insurance Premium Plan", None),
        transaction("acct_1", "2026-03-24", -55.0, "Insurance Premium Plan", None),
    ];

    // the charge has been missing for over two months; the prediction
    // must roll forward past `as_of` instead of pointing at the past
    let detected = run_scenario(&rows, "2026-06-01");
    assert_eq!(detected.len(), 1);
    assert_eq!(detected[0]["next_date"].as_str(), Some("2026-06-22T00:00:00"));
}

#[test]
fn output_is_capped_at_ten_and_sorted_by_next_date() {
    let words = [
        "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india",
        "juliet", "kilo", "lima",
    ];

    let mut rows = Vec::new();
    for (index, word) in words.iter().enumerate() {
        let offset = index as u32;
        let description = format!("{word} streaming service");
        rows.push(transaction(
            "acct_1",
            &format!("2026-02-{:02}", 1 + offset),
            -12.0,
            &description,
            None,
        ));
        rows.push(transaction(
            "acct_1",
            &format!("2026-03-{:02}", 3 + offset),
            -12.0,
            &description,
            None,
        ));
        rows.push(transaction(
            "acct_1",
            &format!("2026-04-{:02}", 2 + offset),
            -12.0,
            &description,
            None,
        ));
    }

    let detected = run_scenario(&rows, "2026-04-20");
    assert_eq!(detected.len(), 10);

    let next_dates = detected
        .iter()
        .filter_map(|row| row["next_date"].as_str())
        .collect::<Vec<&str>>();
    assert_eq!(next_dates.len(), 10);
    for pair in next_dates.windows(2) {
        assert!(pair[0] <= pair[1]);
    }
}

#[test]
fn repeated_runs_return_identical_payloads() {
    let temp = temp_home_in_tmp("billwatch-determinism");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let rows = vec![
            transaction("acct_1", "2026-01-21", -15.49, "Netflix.com", None),
            transaction("acct_1", "2026-02-20", -15.49, "Netflix.com", None),
            transaction("acct_1", "2026-03-22", -15.49, "Netflix.com", None),
            transaction("acct_2", "2026-01-10", -9.99, "Spotify Premium", None),
            transaction("acct_2", "2026-02-09", -9.99, "Spotify Premium", None),
            transaction("acct_2", "2026-03-11", -9.99, "Spotify Premium", None),
        ];
        import_rows(&home, &rows);

        let first = recurring_payload(&home, Some("2026-04-01"));
        let second = recurring_payload(&home, Some("2026-04-01"));
        assert_eq!(first["data"], second["data"]);
    }
}

#[test]
fn empty_ledger_yields_an_empty_result_not_an_error() {
    let temp = temp_home_in_tmp("billwatch-empty");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let payload = recurring_payload(&home, Some("2026-04-01"));
        assert_eq!(payload["ok"].as_bool(), Some(true));
        let rows = recurring_rows(&home, Some("2026-04-01"));
        assert!(rows.is_empty());
    }
}

#[test]
fn rejects_malformed_as_of_dates() {
    use billwatch_client::commands::recurring::{self, RecurringRunOptions};

    let temp = temp_home_in_tmp("billwatch-as-of");
    assert!(temp.is_ok());
    if let Ok((_dir, home)) = temp {
        let result = recurring::run_with_options(RecurringRunOptions {
            as_of: Some("2026-02-31".to_string()),
            home_override: Some(&home),
        });
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "invalid_argument");
        }
    }
}

#[test]
fn emitted_rows_carry_the_full_contract_field_set() {
    let rows = vec![
        transaction("acct_1", "2026-01-21", -15.49, "Netflix.com", None),
        transaction("acct_1", "2026-02-20", -15.49, "Netflix.com", None),
        transaction("acct_1", "2026-03-22", -15.49, "Netflix.com", None),
    ];

    let detected = run_scenario(&rows, "2026-04-01");
    assert_eq!(detected.len(), 1);

    let row = &detected[0];
    assert!(row["key"].is_string());
    assert!(row["account_id"].is_string());
    assert!(row["label"].is_string());
    assert!(row["cadence"].is_string());
    assert!(row["average_amount"].is_i64());
    assert!(row["last_date"].is_string());
    assert!(row["next_date"].is_string());
    assert!(row["icon_url"].is_null() || row["icon_url"].is_string());
    assert!(row["category_color"].is_null() || row["category_color"].is_string());
}

#[test]
fn decoration_fields_pass_through_from_the_latest_transaction() {
    let decorated = serde_json::json!({
        "account_id": "acct_1",
        "posted_at": "2026-03-22",
        "amount": -15.49,
        "description": "Netflix.com",
        "icon_url": "https://cdn.example/netflix.png",
        "category_color": "#e50914",
        "category_icon_lib": "material",
        "category_icon_name": "movie",
    });
    let rows = vec![
        transaction("acct_1", "2026-01-21", -15.49, "Netflix.com", None),
        transaction("acct_1", "2026-02-20", -15.49, "Netflix.com", None),
        decorated,
    ];

    let detected = run_scenario(&rows, "2026-04-01");
    assert_eq!(detected.len(), 1);
    assert_eq!(
        detected[0]["icon_url"].as_str(),
        Some("https://cdn.example/netflix.png")
    );
    assert_eq!(detected[0]["category_color"].as_str(), Some("#e50914"));
    assert_eq!(detected[0]["category_icon_lib"].as_str(), Some("material"));
    assert_eq!(detected[0]["category_icon_name"].as_str(), Some("movie"));
}
