fn main() {
    if let Err(e) = cc_drv::run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
