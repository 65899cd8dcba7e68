use crate::{
    config::{self, Settings},
    error, info,
    server::{AppState, start_api_server},
    success, warning,
};

/// Runs the dashboard server until it fails or the process is stopped.
///
/// With `open`, the login page is opened in the default browser once the
/// server task is running.
pub async fn serve(open: bool) {
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!(
            "Invalid configuration: {}. Add it to {} or export it.",
            e,
            config::secrets_path().display()
        ),
    };

    let state = match AppState::from_settings(&settings) {
        Ok(state) => state,
        Err(e) => error!("Cannot set up Spotify client: {}", e),
    };

    let addr = settings.server_addr;
    info!("Using Gemini model {}", settings.gemini.model);

    let server = tokio::spawn(async move { start_api_server(state, addr).await });
    success!("Dashboard server listening on http://{}", addr);

    if open {
        let login_url = format!("http://{addr}/login");
        if webbrowser::open(&login_url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                login_url
            )
        }
    }

    match server.await {
        Ok(Ok(())) => info!("Server stopped"),
        Ok(Err(e)) => error!("Server failed: {}", e),
        Err(e) => error!("Server task aborted: {}", e),
    }
}
