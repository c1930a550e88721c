use super::*;

fn account(handle: &str, display_name: &str) -> AccountConfig {
    AccountConfig {
        handle: handle.to_string(),
        display_name: display_name.to_string(),
        platform: "instagram".to_string(),
        active: true,
        notes: None,
    }
}

#[test]
fn normalized_handle_strips_at_sign() {
    let a = account("@NileTours", "Nile Tours");
    assert_eq!(a.normalized_handle(), "niletours");
}

#[test]
fn normalized_handle_lowercases() {
    let a = account("Cairo.Trips_01", "Cairo Trips");
    assert_eq!(a.normalized_handle(), "cairo.trips_01");
}

#[test]
fn normalized_handle_trims_whitespace() {
    let a = account("  sharm_deals ", "Sharm Deals");
    assert_eq!(a.normalized_handle(), "sharm_deals");
}

#[test]
fn validate_rejects_empty_handle() {
    let file = AccountsFile {
        accounts: vec![account("@", "No Handle")],
    };
    let result = validate_accounts(&file);
    assert!(
        matches!(result, Err(ConfigError::Validation(_))),
        "expected validation error, got: {result:?}"
    );
}

#[test]
fn validate_rejects_invalid_characters() {
    let file = AccountsFile {
        accounts: vec![account("bad handle!", "Bad Handle")],
    };
    assert!(validate_accounts(&file).is_err());
}

#[test]
fn validate_rejects_duplicate_handles() {
    let file = AccountsFile {
        accounts: vec![
            account("niletours", "Nile Tours"),
            account("@NILETOURS", "Nile Tours Again"),
        ],
    };
    let result = validate_accounts(&file);
    assert!(
        matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("duplicate")),
        "expected duplicate-handle error, got: {result:?}"
    );
}

#[test]
fn validate_rejects_empty_display_name() {
    let file = AccountsFile {
        accounts: vec![account("niletours", "  ")],
    };
    assert!(validate_accounts(&file).is_err());
}

#[test]
fn validate_accepts_well_formed_file() {
    let file = AccountsFile {
        accounts: vec![
            account("niletours", "Nile Tours"),
            account("sharm_deals", "Sharm Deals"),
        ],
    };
    assert!(validate_accounts(&file).is_ok());
}

#[test]
fn yaml_parses_with_defaults() {
    let yaml = "accounts:\n  - handle: niletours\n    display_name: Nile Tours\n";
    let file: AccountsFile = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(file.accounts.len(), 1);
    assert_eq!(file.accounts[0].platform, "instagram");
    assert!(file.accounts[0].active);
    assert!(file.accounts[0].notes.is_none());
}
