use addrcheck_core::{AddressCodec, CodecConfig};
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "addrcheck")]
#[command(about = "Validate and canonicalize EIP-55 / EIP-1191 hex addresses")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check addresses for validity, one verdict per line
    Check {
        /// Addresses to check
        #[arg(required = true)]
        addresses: Vec<String>,

        /// Accept any well-formed casing without checksum verification
        #[arg(long)]
        no_strict: bool,
    },

    /// Print the canonical checksummed form of each address
    Format {
        /// Addresses to canonicalize
        #[arg(required = true)]
        addresses: Vec<String>,

        /// Salt the checksum with this chain id (EIP-1191)
        #[arg(long)]
        chain_id: Option<u64>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let codec = AddressCodec::new(&CodecConfig::default())?;
    let mut failures = 0usize;

    match cli.command {
        Commands::Check { addresses, no_strict } => {
            for address in &addresses {
                let valid = codec.is_address(address, !no_strict);
                if !valid {
                    failures += 1;
                }
                println!("{address}\t{}", if valid { "valid" } else { "invalid" });
            }
        }
        Commands::Format { addresses, chain_id } => {
            for address in &addresses {
                match codec.get_address(address, chain_id) {
                    Ok(canonical) => println!("{canonical}"),
                    Err(err) => {
                        failures += 1;
                        eprintln!("{err}");
                    }
                }
            }
        }
    }

    debug!(failures = failures, "done");
    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}
