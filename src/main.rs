fn main() -> std::process::ExitCode {
    ipfs_desktop_lib::run()
}
