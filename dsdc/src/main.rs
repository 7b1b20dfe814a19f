use clap::Command;
use dsdlib::compiler;
use std::{fs::OpenOptions, io::Write, process};

mod cli;

fn main() {
    tracing_subscriber::fmt::init();

    let cmd = clap::Command::new("dsdc")
        .bin_name("dsdc")
        .subcommand_required(true)
        .subcommand(
            Command::new("check")
                .about(
                    "Parses an input .ts translation scheme, checking syntax and attribute references",
                )
                .arg(cli::arg_in_file()),
        )
        .subcommand(
            Command::new("translate")
                .about("Translates an input CRN into a DSD system using the given scheme")
                .arg(cli::arg_in_file())
                .arg(cli::arg_crn_file())
                .arg(cli::arg_out_file()),
        )
        .subcommand(
            Command::new("dev").about("Initiates an interactive REPL prototyping environment"),
        );

    let arg_matches = cmd.get_matches();
    match arg_matches.subcommand() {
        Some(("check", arg_matches)) => {
            let input_fname = arg_matches
                .get_one::<String>("source")
                .expect("missing source file name");

            let _ = cli::scheme::read_scheme(input_fname);

            println!("ok");
        }
        Some(("translate", arg_matches)) => {
            let input_fname = arg_matches
                .get_one::<String>("source")
                .expect("missing source file name");
            let crn_fname = arg_matches
                .get_one::<String>("crn")
                .expect("missing CRN file name");

            let (source, scheme) = cli::scheme::read_scheme(input_fname);
            let crn_input = cli::scheme::read_source(crn_fname);
            let crn = match compiler::parse_crn(&crn_input) {
                Ok(crn) => crn,
                Err(e) => {
                    cli::scheme::report(crn_fname, &crn_input, &e);

                    process::exit(1);
                }
            };
            let sys = match compiler::translate(&scheme, &crn) {
                Ok(sys) => sys,
                Err(e) => {
                    cli::scheme::report(input_fname, &source, &e);

                    process::exit(1);
                }
            };

            match arg_matches.get_one::<String>("out") {
                Some(out_fname) => {
                    let mut out_f = OpenOptions::new()
                        .write(true)
                        .create(true)
                        .truncate(true)
                        .open(out_fname)
                        .expect("failed to open output file");

                    out_f
                        .write_all(sys.to_string().as_bytes())
                        .expect("failed to write output file");
                }
                None => print!("{}", sys),
            }
        }
        Some(("dev", _)) => cli::scheme::repl(),
        _ => unreachable!("subcommand is required"),
    }
}
