use clap::Parser;

/// Command-line options for the finanzas service.
#[derive(Debug, Parser)]
#[command(name = "finanzas-core", about = "Servicio de finanzas personales")]
pub struct Args {
    /// Overrides SERVER_PORT from the environment.
    #[arg(long)]
    pub port: Option<u16>,
}
