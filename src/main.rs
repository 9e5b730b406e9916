fn main() -> std::process::ExitCode {
    cardlens_lib::run()
}
