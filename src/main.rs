fn main() {
    if let Err(err) = oreflow::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
