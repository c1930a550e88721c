use super::*;

fn client() -> ProfileClient {
    ProfileClient::new("https://www.instagram.com", 30, "tripintel/0.1", 0, 0).unwrap()
}

#[test]
fn media_url_without_cursor() {
    let url = client().media_url("niletours", 12, None);
    assert_eq!(
        url,
        "https://www.instagram.com/niletours/?__a=1&__d=dis&count=12"
    );
}

#[test]
fn media_url_with_cursor() {
    let url = client().media_url("niletours", 12, Some("QVFDabc123"));
    assert_eq!(
        url,
        "https://www.instagram.com/niletours/?__a=1&__d=dis&count=12&after=QVFDabc123"
    );
}

#[test]
fn base_url_strips_path() {
    let c = ProfileClient::new("https://www.instagram.com/some/path", 30, "ua", 0, 0).unwrap();
    assert_eq!(c.base_url(), "https://www.instagram.com");
}

#[test]
fn new_rejects_invalid_base_url() {
    let result = ProfileClient::new("not-a-url", 30, "ua", 0, 0);
    assert!(
        matches!(result, Err(ScraperError::InvalidBaseUrl { .. })),
        "expected InvalidBaseUrl"
    );
}

#[test]
fn login_wall_detection_matches_html() {
    assert!(looks_like_login_wall(
        "<!DOCTYPE html><html><body>Log in</body></html>"
    ));
    assert!(looks_like_login_wall("  <html lang=\"en\"><head>"));
}

#[test]
fn login_wall_detection_ignores_json() {
    assert!(!looks_like_login_wall("{\"graphql\": {}}"));
    assert!(!looks_like_login_wall(""));
}
