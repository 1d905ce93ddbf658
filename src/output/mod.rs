use std::{
    io,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use log::{info, warn};

use crate::{chart::Figure, error::Result};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Standalone page for `figure`. The Plotly runtime is fetched from its CDN
/// when the page is viewed.
pub fn render_html(figure: &Figure) -> Result<String> {
    // `</script>` inside a string literal would end the script element
    let json = serde_json::to_string(figure)?.replace("</", "<\\/");

    Ok(TEMPLATE
        .replace("__PLOTLY_SRC__", PLOTLY_CDN)
        .replace("__FIGURE__", &json))
}

/// Writes the chart and returns its absolute path.
pub fn write_html(figure: &Figure, path: &Path) -> Result<PathBuf> {
    std::fs::write(path, render_html(figure)?)?;
    let path = std::path::absolute(path)?;
    info!("chart written to {}", path.display());
    Ok(path)
}

/// Best effort: a missing or failing opener only produces a warning.
pub fn open_in_browser(path: &Path) -> bool {
    match launch(path) {
        Ok(()) => true,
        Err(err) => {
            warn!("could not open browser automatically: {err}");
            warn!("please open {} manually in your browser", path.display());
            false
        }
    }
}

fn launch(path: &Path) -> io::Result<()> {
    let status = opener(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("opener exited with {status}")))
    }
}

#[cfg(target_os = "macos")]
fn opener(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(path);
    cmd
}

#[cfg(target_os = "windows")]
fn opener(path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(path);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener(path: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(path);
    cmd
}

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Bank Account Balance</title>
  <script src="__PLOTLY_SRC__" charset="utf-8"></script>
  <style>
    html, body { margin: 0; background: white; }
    #balance-chart { width: 100%; height: 600px; }
  </style>
</head>
<body>
  <div id="balance-chart"></div>
  <script>
    const figure = __FIGURE__;
    Plotly.newPlot("balance-chart", figure.data, figure.layout, figure.config);
  </script>
</body>
</html>
"##;
