use std::time::Duration;

use reqwest::Client;

const DISABLE_SYSTEM_PROXY_ENV: &str = "CONFAB_DISABLE_SYSTEM_PROXY";

/// Hard deadline per provider request. Completions are bounded by
/// max_tokens, so anything slower than this is a hung connection.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub(crate) fn build_http_client() -> Client {
    let mut builder = Client::builder().timeout(REQUEST_TIMEOUT);
    if should_disable_system_proxy() {
        builder = builder.no_proxy();
    }
    builder.build().expect("Failed to build reqwest client")
}

fn should_disable_system_proxy() -> bool {
    if std::env::var_os(DISABLE_SYSTEM_PROXY_ENV).is_some() {
        return true;
    }

    cfg!(test)
}
