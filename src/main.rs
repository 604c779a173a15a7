use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::debug;
use std::io::{self, Write};
use std::path::PathBuf;

use cidrcalc::config::{load_plan, DivideOptions, OutputFormat};
use cidrcalc::ops;
use cidrcalc::output::render;

/// Subnet address-space calculator
#[derive(Parser, Debug)]
#[command(name = "cidr", author, version, about, long_about = None)]
struct Args {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Tab, global = true)]
    out: OutputFormat,

    /// Log allocation steps to stderr (RUST_LOG overrides)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count addresses in CIDR networks
    #[command(visible_aliases = ["c", "num"])]
    Count {
        #[arg(required = true)]
        cidrs: Vec<String>,
    },

    /// Check if a network contains specific addresses
    #[command(visible_alias = "in")]
    Contains {
        cidr: String,
        #[arg(required = true)]
        addresses: Vec<String>,
    },

    /// Divide a CIDR into smaller subnets
    #[command(visible_alias = "d")]
    Divide {
        cidr: String,
        count: usize,
        /// Bisect the largest block until the count is reached instead of
        /// emitting equal-size subnets
        #[arg(short, long)]
        vlsm: bool,
    },

    /// Allocate subnets sized to host counts (IPv4 only)
    #[command(visible_alias = "v")]
    Vlsm {
        #[arg(required_unless_present = "plan")]
        cidr: Option<String>,
        #[arg(required_unless_present = "plan")]
        hosts: Vec<u64>,
        /// YAML plan naming the network and subnets
        #[arg(long, conflicts_with_all = ["cidr", "hosts"])]
        plan: Option<PathBuf>,
    },

    /// Embed IPv4 addresses in an IPv6 network (RFC 6052)
    #[command(visible_alias = "e")]
    Embed {
        cidr: String,
        #[arg(required = true)]
        addresses: Vec<String>,
    },

    /// Explain CIDR networks; v4 and v6 may be mixed
    #[command(visible_alias = "x")]
    Explain {
        #[arg(required = true)]
        cidrs: Vec<String>,
    },
}

fn run(command: Command, format: OutputFormat, w: &mut dyn Write) -> Result<()> {
    match command {
        Command::Count { cidrs } => {
            for cidr in &cidrs {
                let report = ops::count(cidr).wrap_err_with(|| format!("Invalid CIDR '{}'", cidr))?;
                render(&report, format, w)?;
            }
        }
        Command::Contains { cidr, addresses } => {
            let report = ops::contains(&cidr, &addresses)
                .wrap_err_with(|| format!("Invalid CIDR '{}'", cidr))?;
            render(&report, format, w)?;
        }
        Command::Divide { cidr, count, vlsm } => {
            let options = DivideOptions::from_vlsm_flag(vlsm);
            let report = ops::divide(&cidr, count, &options)
                .wrap_err_with(|| format!("Could not divide '{}'", cidr))?;
            render(&report, format, w)?;
        }
        Command::Vlsm { cidr, hosts, plan } => {
            let report = match (plan, cidr) {
                (Some(path), _) => {
                    let plan = load_plan(&path)?;
                    ops::vlsm_plan(&plan)
                        .wrap_err_with(|| format!("Could not allocate plan '{}'", path.display()))?
                }
                (None, Some(cidr)) => ops::vlsm(&cidr, &hosts)
                    .wrap_err_with(|| format!("Could not allocate in '{}'", cidr))?,
                (None, None) => color_eyre::eyre::bail!("A CIDR or --plan is required"),
            };
            render(&report, format, w)?;
        }
        Command::Embed { cidr, addresses } => {
            let report = ops::embed(&cidr, &addresses)
                .wrap_err_with(|| format!("Could not embed into '{}'", cidr))?;
            render(&report, format, w)?;
        }
        Command::Explain { cidrs } => {
            for cidr in &cidrs {
                let report = ops::explain(cidr).wrap_err_with(|| format!("Invalid CIDR '{}'", cidr))?;
                render(&report, format, w)?;
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Results go to stdout, so keep the default log level quiet
    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    debug!("Running {:?} with {:?} output", args.command, args.out);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(args.command, args.out, &mut out)?;
    out.flush()?;
    Ok(())
}
