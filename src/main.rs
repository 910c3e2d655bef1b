use clap::Parser;
use netcalc_tools::cli::{Cli, Command, PortsArgs, ServeArgs, SubnetArgs};
use netcalc_tools::config::ServerConfig;
use netcalc_tools::output::{print_json, render_ports, render_subnet};
use netcalc_tools::{calculate, port_lookup, start_server, PortLookupRequest, SubnetQuery};
use std::error::Error;
use std::process;

#[tokio::main]
async fn main() {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = netcalc_tools::logging::init_logging(&cli.log_config, cli.log_level) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(1);
    }
    log::debug!("#Start main() netcalc v{}", netcalc_tools::VERSION);

    let result = match &cli.command {
        Command::Subnet(args) => run_subnet(args),
        Command::Ports(args) => run_ports(args),
        Command::Serve(args) => run_serve(args).await,
    };

    if let Err(e) = result {
        log::debug!("Exiting with error: {e:?}");
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run_subnet(args: &SubnetArgs) -> Result<(), Box<dyn Error>> {
    let result = calculate(&SubnetQuery::from(args))?;
    if args.json {
        print_json(&result)?;
    } else {
        println!("{}", render_subnet(&result));
    }
    Ok(())
}

fn run_ports(args: &PortsArgs) -> Result<(), Box<dyn Error>> {
    let response = port_lookup(&PortLookupRequest::from(args))
        .ok_or("Provide at least one port number or service name.")?;
    if args.json {
        print_json(&response)?;
    } else {
        println!("{}", render_ports(&response.results));
    }
    Ok(())
}

async fn run_serve(args: &ServeArgs) -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::new(args.bind_addr, args.max_body_bytes);
    log::info!("Starting netcalc server v{}", netcalc_tools::VERSION);

    tokio::select! {
        result = start_server(config) => result,
        _ = tokio::signal::ctrl_c() => {
            log::info!("Received shutdown signal, stopping server...");
            Ok(())
        }
    }
}
