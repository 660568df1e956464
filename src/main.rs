fn main() {
    if let Err(err) = wbs_layout::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
