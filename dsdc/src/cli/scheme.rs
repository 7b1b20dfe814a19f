use ariadne::{Color, Label, Report, ReportKind, Source};
use dsdlib::{
    compiler::{self, Scheme},
    error::SchemeError,
    interpreter::Scope,
    parser::parser_scheme,
};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fs::OpenOptions, io::Read, process};

pub fn read_source(in_fname: &str) -> String {
    let mut input = String::new();

    OpenOptions::new()
        .read(true)
        .open(in_fname)
        .expect("failed to open input file")
        .read_to_string(&mut input)
        .expect("failed to read input file");

    input
}

pub fn read_scheme(in_fname: &str) -> (String, Scheme) {
    if !in_fname.ends_with(dsdlib::SCHEME_EXTENSION) {
        tracing::warn!(
            "{} does not have the conventional {} extension",
            in_fname,
            dsdlib::SCHEME_EXTENSION
        );
    }

    let input = read_source(in_fname);

    match Scheme::parse(&input) {
        Ok(scheme) => (input, scheme),
        Err(e) => {
            report(in_fname, &input, &e);

            process::exit(1);
        }
    }
}

pub fn report(fname: &str, input: &str, err: &SchemeError) {
    let span = err.span().unwrap_or(0..0);

    Report::build(ReportKind::Error, (fname, span.clone()))
        .with_message(err.to_string())
        .with_label(
            Label::new((fname, span))
                .with_message(err.to_string())
                .with_color(Color::Red),
        )
        .finish()
        .eprint((fname, Source::from(input)))
        .unwrap();
}

/// An interactive environment: lines are evaluated as expressions, or
/// loaded as definitions if they parse as statements.
pub fn repl() {
    let mut rl = DefaultEditor::new().expect("failed to get readline editor");
    let mut env = match compiler::base_environment() {
        Ok(env) => env,
        Err(e) => {
            eprintln!("{}", e);

            return;
        }
    };

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                match parser_scheme::parse_expr(line) {
                    Ok(expr) => match env.eval(&Scope::root(), &expr) {
                        Ok(v) => println!("{}", v),
                        Err(e) => report("<STDIN>", line, &e),
                    },
                    Err(_) => {
                        if let Err(e) =
                            parser_scheme::parse(line).and_then(|stmts| env.load(&stmts))
                        {
                            report("<STDIN>", line, &e);
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                return;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);

                return;
            }
        }
    }
}
