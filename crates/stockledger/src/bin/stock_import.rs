//! stock-import - Import a source export into the local store.

fn main() -> std::process::ExitCode {
    stockledger::cmd::import_cmd::main()
}
