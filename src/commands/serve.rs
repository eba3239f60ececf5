//! Serve command implementation

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::Project;
use crate::server::StaticServer;
use crate::utils::terminal::{print_info, print_success, print_warning};

/// Host the static content directory over HTTP until interrupted
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Open the game in the default browser once the server is listening
    #[arg(long)]
    pub open: bool,

    /// Accepted and ignored
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub ignored: Vec<String>,
}

impl ServeCommand {
    /// Execute the serve command; blocks until Ctrl-C
    pub fn execute(self, project: &Project, verbose: bool) -> Result<()> {
        println!("Hosting server: {}", project.name());

        if verbose && !self.ignored.is_empty() {
            print_info(&format!("Ignoring arguments: {}", self.ignored.join(" ")));
        }

        let static_dir = project.layout.static_dir.clone();
        if !static_dir.is_dir() {
            print_warning(&format!(
                "{} does not exist, every request will return 404",
                static_dir.display()
            ));
        }

        let addr = project.config.server.bind_addr();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;

        runtime.block_on(async {
            let server = StaticServer::bind(&addr, static_dir.clone()).await?;
            let url = browse_url(server.local_addr()?);

            print_success(&format!("Serving {} at {}", static_dir.display(), url));
            print_info("Press Ctrl-C to stop");

            if self.open {
                if let Err(e) = open::that(&url) {
                    print_warning(&format!("Could not open browser: {}", e));
                }
            }

            server.run().await
        })?;

        print_info("Server stopped");
        Ok(())
    }
}

/// URL a local browser can use; wildcard binds are shown as localhost
fn browse_url(addr: SocketAddr) -> String {
    if addr.ip().is_unspecified() {
        format!("http://localhost:{}/", addr.port())
    } else {
        format!("http://{}/", addr)
    }
}
