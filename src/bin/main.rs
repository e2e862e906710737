use clap::{Parser, Subcommand};
use mrtlpm::orginfo::OrgInfoTable;
use mrtlpm::{ingest, LpmTable};
use std::fs::File;
use std::io::BufWriter;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "mrtlpm", about = "Build and query an MRT-derived IPv4 origin-AS table")]
struct Opts {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode an MRT TABLE_DUMP_V2 dump and save the resulting table.
    ///
    /// The table maps prefixes to origin AS numbers only (see the
    /// on-disk format); AS-to-country annotation is resolved at lookup
    /// time instead, since it has no slot in that format.
    Build {
        /// Path to the MRT dump (optionally .gz or .bz2 compressed).
        mrt_file: PathBuf,
        /// Where to write the resulting table.
        #[arg(long)]
        out: PathBuf,
    },
    /// Look up an IPv4 address in a previously built table.
    Lookup {
        /// Path to a table written by `build`.
        table_file: PathBuf,
        /// The address to look up.
        addr: Ipv4Addr,
        /// Path to a CAIDA as-org2info.txt file, for per-AS country annotation.
        #[arg(long)]
        orginfo: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let opts = Opts::parse();

    let result = match opts.command {
        Command::Build { mrt_file, out } => run_build(&mrt_file, &out),
        Command::Lookup {
            table_file,
            addr,
            orginfo,
        } => run_lookup(&table_file, addr, orginfo.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn run_build(
    mrt_file: &std::path::Path,
    out: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = mrtlpm::io::open_source(mrt_file)?;
    let (table, stats) = ingest(source)?;
    log::info!(
        "{} records seen, {} prefixes inserted, {} records skipped",
        stats.records_seen,
        stats.prefixes_inserted,
        stats.records_skipped
    );

    let mut writer = BufWriter::new(File::create(out)?);
    table.save(&mut writer)?;
    Ok(())
}

fn run_lookup(
    table_file: &std::path::Path,
    addr: Ipv4Addr,
    orginfo_path: Option<&std::path::Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = File::open(table_file)?;
    let table = LpmTable::load(&mut reader)?;

    match table.lookup(addr) {
        Some(origin_as) => {
            if let Some(path) = orginfo_path {
                let org_info = OrgInfoTable::load(path)?;
                match org_info.get(origin_as) {
                    Some(info) => println!("{} AS{} {} ({})", addr, origin_as, info.country, info.as_name),
                    None => println!("{} AS{}", addr, origin_as),
                }
            } else {
                println!("{} AS{}", addr, origin_as);
            }
            Ok(())
        }
        None => Err(format!("no match for {}", addr).into()),
    }
}
