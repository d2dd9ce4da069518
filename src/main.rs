use std::{env, fs::read_to_string, path::Path, process::exit, sync::Arc, time::Instant};

use exprcheck::{
    checker::{checker::check, config::Config},
    display_error,
    environment::table::TypeTable,
    lexer::lexer::tokenize,
    parser::parser::parse,
};
use tracing::{error, info};

fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let strict = args.iter().any(|arg| arg == "--strict");
    let files: Vec<&String> = args.iter().filter(|arg| !arg.starts_with("--")).collect();

    let [file_path] = files.as_slice() else {
        eprintln!("usage: exprcheck <file> [--strict]");
        exit(2);
    };

    let file_name = Path::new(file_path.as_str())
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.to_string());

    let source = match read_to_string(file_path.as_str()) {
        Ok(source) => source,
        Err(err) => {
            error!(file = %file_path, "failed to read file: {}", err);
            exit(2);
        }
    };

    let start = Instant::now();

    let tokens = match tokenize(source.clone(), Some(file_name.clone())) {
        Ok(tokens) => tokens,
        Err(err) => fail(&err, &source, file_path),
    };
    info!("Tokenized in {:?}", start.elapsed());

    let parse_start = Instant::now();
    let mut tree = match parse(tokens, Arc::new(file_name)) {
        Ok(tree) => tree,
        Err(err) => fail(&err, &source, file_path),
    };
    info!("Parsed in {:?}", parse_start.elapsed());

    let config = if strict {
        Config::new().with_env(TypeTable::new()).strict(true)
    } else {
        Config::new()
    };

    let check_start = Instant::now();
    let ty = match check(&mut tree, &config) {
        Ok(ty) => ty,
        Err(err) => fail(&err, &source, file_path),
    };
    info!("Type checked in {:?}", check_start.elapsed());
    info!("Total time: {:?}", start.elapsed());

    println!("{}", ty);
}

fn fail(err: &exprcheck::errors::errors::Error, source: &str, file: &str) -> ! {
    print!("{}", display_error(err, source, file));
    exit(1);
}
