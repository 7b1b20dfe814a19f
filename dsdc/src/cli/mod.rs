pub mod scheme;

use clap::{Arg, ArgAction};

pub fn arg_in_file() -> Arg {
    Arg::new("source")
        .value_name("SOURCE")
        .require_equals(true)
        .action(ArgAction::Set)
}

pub fn arg_crn_file() -> Arg {
    Arg::new("crn")
        .value_name("CRN")
        .require_equals(true)
        .action(ArgAction::Set)
}

pub fn arg_out_file() -> Arg {
    Arg::new("out")
        .short('o')
        .long("out")
        .value_name("OUT")
        .require_equals(true)
        .action(ArgAction::Set)
}
