use snap_analog::app;

fn main() {
    if let Err(e) = app::main() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
