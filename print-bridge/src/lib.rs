//! Print Bridge - local HTTP service for thermal receipt printers
//!
//! # Architecture
//!
//! - **Receipts** (`receipt`): order model plus bill and KOT layouts
//! - **Printing** (`printing`): printer registry, job history, background jobs
//! - **Services** (`services`): machine identity, notifications, WebSocket events
//! - **HTTP API** (`api`): axum routes and the `/ws` push channel
//!
//! # Layout
//!
//! ```text
//! print-bridge/src/
//! ├── core/       # config, state, errors, server loop
//! ├── api/        # HTTP routes and handlers
//! ├── printing/   # registry, job store, print service
//! ├── receipt/    # order model and layouts
//! ├── services/   # identity, notifier, event hub
//! └── utils/      # logging, HTTP errors
//! ```

pub mod api;
pub mod core;
pub mod printing;
pub mod receipt;
pub mod services;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use printing::{JobStatus, PrintJob, PrintRequest, PrintService};
pub use utils::{AppError, AppResult};

pub use utils::logger::init_logger_with_file;

/// Load `.env`, read the configuration and set up logging from it
pub fn setup_environment() -> Config {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}

pub fn print_banner() {
    println!(
        r#"
    ____       _       __     ____       _     __
   / __ \_____(_)___  / /_   / __ )_____(_)___/ /___ ____
  / /_/ / ___/ / __ \/ __/  / __  / ___/ / __  / __ `/ _ \
 / ____/ /  / / / / / /_   / /_/ / /  / / /_/ / /_/ /  __/
/_/   /_/  /_/_/ /_/\__/  /_____/_/  /_/\__,_/\__, /\___/
                                             /____/
    "#
    );
}
