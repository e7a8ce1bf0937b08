#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = floating_forms::cli::Cli::parse();
    floating_forms::flow::run(cli.into_config())
}

// The browser build starts from the library's `wasm_bindgen(start)` entry.
#[cfg(target_arch = "wasm32")]
fn main() {}
