use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Finds a system Chromium binary, preferring an explicit `CHROMIUM_PATH`.
fn find_chromium() -> Option<PathBuf> {
    if let Ok(path) = env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(&path);
        if path.exists() {
            return Some(path);
        }
    }

    for binary in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(binary) {
            return Some(path);
        }
    }

    None
}

pub struct HeadlessBrowser {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl HeadlessBrowser {
    pub async fn launch() -> Result<Self, Box<dyn Error>> {
        let chrome_path = find_chromium().ok_or("No Chromium binary found")?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .request_timeout(NAVIGATION_TIMEOUT)
            .build()?;

        let (browser, mut handler) = Browser::launch(config).await?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Navigates to the URL, waits out the client-side render and returns the page HTML.
    pub async fn render(&self, url: &str, render_delay: Duration) -> Result<String, Box<dyn Error>> {
        debug!("Rendering {}", url);

        let page = self.browser.new_page(url).await?;

        tokio::time::sleep(render_delay).await;

        let html = page.content().await?;

        page.close().await?;

        Ok(html)
    }

    pub async fn close(mut self) {
        if let Err(err) = self.browser.close().await {
            debug!("Failed closing browser: {}", err);
        }

        let _ = self.browser.wait().await;
        self.handler_task.abort();
    }
}
