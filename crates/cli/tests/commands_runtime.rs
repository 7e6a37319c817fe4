use std::env;
use std::fs;
use std::sync::{Mutex, OnceLock};

use chrono::NaiveDate;
use clearance_cli::commands::evaluate::{self, QuoteRequest};
use clearance_cli::commands::{migrate, price, settings};
use clearance_cli::{KindArg, ProductArgs, SettingsArgs};
use clearance_core::config::LoadOptions;
use rust_decimal::Decimal;
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn migrate_returns_success_with_file_database() {
    with_database(|_dir| {
        let result = migrate::run(&LoadOptions::default());
        assert_eq!(result.exit_code, 0, "expected successful migrate run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "migrate");
        assert_eq!(payload["status"], "ok");
    });
}

#[test]
fn commands_fail_with_config_error_for_non_sqlite_url() {
    with_env(&[("CLEARANCE_DATABASE_URL", "postgres://localhost/shop")], || {
        let result = settings::show(&LoadOptions::default());
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn fresh_store_reports_disabled_settings() {
    with_database(|_dir| {
        let result = settings::show(&LoadOptions::default());
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["enabled"], false);
        assert_eq!(payload["data"]["from_date"], Value::Null);
    });
}

#[test]
fn saved_settings_round_trip_through_show() {
    with_database(|_dir| {
        let options = LoadOptions::default();
        let saved = settings::save(&options, live_form());
        assert_eq!(saved.exit_code, 0, "{}", saved.output);

        let payload = parse_payload(&settings::show(&options).output);
        assert_eq!(payload["data"]["enabled"], true);
        assert_eq!(payload["data"]["override_simple"], true);
        assert_eq!(payload["data"]["from_date"], "2026-11-27");
        assert_eq!(payload["data"]["to_date"], "2026-11-30");
    });
}

#[test]
fn settings_form_rejects_unparseable_dates() {
    with_database(|_dir| {
        let mut form = live_form();
        form.from_date = "27/11/2026".to_string();

        let result = settings::save(&LoadOptions::default(), form);
        assert_eq!(result.exit_code, 7);
        assert_eq!(parse_payload(&result.output)["error_class"], "invalid_setting");
    });
}

#[test]
fn price_edit_requires_enabled_clearance() {
    with_database(|_dir| {
        let result = price::set(&LoadOptions::default(), "1042", "19.99");
        assert_eq!(result.exit_code, 7);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "clearance_disabled");
    });
}

#[test]
fn price_set_get_and_column_share_stored_value() {
    with_database(|_dir| {
        let options = LoadOptions::default();
        settings::save(&options, live_form());

        let set = price::set(&options, "1042", " 19.99 ");
        assert_eq!(set.exit_code, 0, "{}", set.output);
        assert_eq!(parse_payload(&set.output)["data"]["clearance_price"], "19.99");

        let get = parse_payload(&price::get(&options, "1042").output);
        assert_eq!(get["data"]["clearance_price"], "19.99");

        let column = parse_payload(&price::column(&options, "1042").output);
        assert_eq!(column["data"]["column"], "19.99");

        let missing = parse_payload(&price::column(&options, "7").output);
        assert_eq!(missing["data"]["column"], "Not filled");
    });
}

#[test]
fn quote_applies_clearance_inside_window() {
    with_database(|_dir| {
        let options = LoadOptions::default();
        settings::save(&options, live_form());
        price::set(&options, "1042", "19.99");

        let inside = parse_payload(&evaluate::quote(&options, quote_request(day(2026, 11, 28))).output);
        assert_eq!(inside["data"]["price"], "19.99");
        assert_eq!(inside["data"]["is_clearance"], true);
        assert_eq!(inside["data"]["source"], "product");
        assert_eq!(inside["data"]["line_total"], "39.98");

        let after = parse_payload(&evaluate::quote(&options, quote_request(day(2026, 12, 1))).output);
        assert_eq!(after["data"]["price"], "29.99");
        assert_eq!(after["data"]["is_clearance"], false);
    });
}

#[test]
fn cart_pricing_reads_json_file_and_is_idempotent() {
    with_database(|dir| {
        let options = LoadOptions::default();
        settings::save(&options, live_form());
        price::set(&options, "1042", "19.99");

        let cart_path = dir.path().join("cart.json");
        fs::write(
            &cart_path,
            r#"{"lines":[
                {"product_id":"1042","regular_price":"29.99","quantity":1},
                {"product_id":"2000","regular_price":"5.00","quantity":3}
            ]}"#,
        )
        .expect("write cart");

        let first = parse_payload(&evaluate::cart(&options, &cart_path, Some(day(2026, 11, 28))).output);
        assert_eq!(first["data"]["summary"]["lines_on_clearance"], 1);
        assert_eq!(first["data"]["summary"]["total"], "34.99");

        let cart_json = serde_json::to_string(&first["data"]["cart"]).expect("serialize cart");
        fs::write(&cart_path, cart_json).expect("rewrite cart");

        let second =
            parse_payload(&evaluate::cart(&options, &cart_path, Some(day(2026, 11, 28))).output);
        assert_eq!(second["data"]["summary"]["total"], "34.99");
        assert_eq!(second["data"]["cart"]["lines"][0]["unit_price"], "19.99");
    });
}

#[test]
fn cart_rejects_malformed_input() {
    with_database(|dir| {
        let cart_path = dir.path().join("broken.json");
        fs::write(&cart_path, "not json").expect("write cart");

        let result = evaluate::cart(&LoadOptions::default(), &cart_path, None);
        assert_eq!(result.exit_code, 7);
        assert_eq!(parse_payload(&result.output)["error_class"], "invalid_input");
    });
}

#[test]
fn overflowing_totals_are_reported_as_invalid_input() {
    with_database(|dir| {
        let options = LoadOptions::default();

        let cart_path = dir.path().join("huge.json");
        fs::write(
            &cart_path,
            r#"{"lines":[{"product_id":"9","regular_price":"40000000000000000000","quantity":4294967295}]}"#,
        )
        .expect("write cart");

        let cart = evaluate::cart(&options, &cart_path, Some(day(2026, 11, 28)));
        assert_eq!(cart.exit_code, 7, "{}", cart.output);
        assert_eq!(parse_payload(&cart.output)["error_class"], "invalid_input");

        let mut request = quote_request(day(2026, 11, 28));
        request.regular_price = Decimal::MAX;
        let quote = evaluate::quote(&options, request);
        assert_eq!(quote.exit_code, 7, "{}", quote.output);
        assert_eq!(parse_payload(&quote.output)["error_class"], "invalid_input");
    });
}

#[test]
fn display_and_label_follow_stored_configuration() {
    with_database(|_dir| {
        let options = LoadOptions::default();
        settings::save(&options, live_form());
        price::set(&options, "1042", "19.99");

        let product = ProductArgs {
            product: "1042".to_string(),
            kind: KindArg::Simple,
            variations: Vec::new(),
        };
        let html = r#"<span class="amount">$29.99</span>"#;

        let display =
            parse_payload(&evaluate::display(&options, &product, html, Some(day(2026, 11, 28))).output);
        assert_eq!(display["data"]["html"], r#"<span class="amount">$</span>19.99"#);

        let label = parse_payload(&evaluate::label(&options, &product, None, None).output);
        assert_eq!(label["data"]["label"], "Clearance");

        let variable = ProductArgs {
            product: "3000".to_string(),
            kind: KindArg::Variable,
            variations: vec!["3001".to_string()],
        };
        let range = parse_payload(
            &evaluate::display(&options, &variable, "$10 – $20", Some(day(2026, 11, 29))).output,
        );
        assert_eq!(range["data"]["html"], "");

        let fallback = parse_payload(&evaluate::label(&options, &variable, Some("Deal"), None).output);
        assert_eq!(fallback["data"]["label"], "Deal");
    });
}

#[test]
fn uninstall_removes_settings_but_keeps_prices() {
    with_database(|_dir| {
        let options = LoadOptions::default();
        settings::save(&options, live_form());
        price::set(&options, "1042", "19.99");

        let result = settings::uninstall(&options);
        assert_eq!(result.exit_code, 0);

        let shown = parse_payload(&settings::show(&options).output);
        assert_eq!(shown["data"]["enabled"], false);

        let kept = parse_payload(&price::get(&options, "1042").output);
        assert_eq!(kept["data"]["clearance_price"], "19.99");
    });
}

fn live_form() -> SettingsArgs {
    SettingsArgs {
        enabled: true,
        override_simple: true,
        override_variable: true,
        from_date: "2026-11-27".to_string(),
        to_date: "2026-11-30".to_string(),
    }
}

fn quote_request(date: NaiveDate) -> QuoteRequest {
    QuoteRequest {
        product: "1042".to_string(),
        variation: None,
        regular_price: Decimal::new(2999, 2),
        quantity: 2,
        date: Some(date),
    }
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_database(test_fn: impl FnOnce(&TempDir)) {
    let dir = TempDir::new().expect("temp dir");
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("clearance.db").display());
    with_env(&[("CLEARANCE_DATABASE_URL", url.as_str())], || test_fn(&dir));
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "CLEARANCE_DATABASE_URL",
        "CLEARANCE_DATABASE_MAX_CONNECTIONS",
        "CLEARANCE_DATABASE_TIMEOUT_SECS",
        "CLEARANCE_STOREFRONT_UTC_OFFSET_MINUTES",
        "CLEARANCE_STOREFRONT_DEFAULT_SALE_LABEL",
        "CLEARANCE_LOGGING_LEVEL",
        "CLEARANCE_LOGGING_FORMAT",
        "CLEARANCE_LOG_LEVEL",
        "CLEARANCE_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
