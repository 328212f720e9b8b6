use std::{env, thread};

use merklelab_playground::{ContextMode, Playground, PlaygroundConfig};
use merklelab_visualize::visualize_stdout;
use tracing::info;

fn main() {
    tutorials::init_tracing();

    // An optional JSON config path can be given as the first argument.
    let config = match env::args().nth(1) {
        Some(path) => PlaygroundConfig::load(path).expect("valid config file"),
        None => PlaygroundConfig::default(),
    };
    let debounce = config.rebuild_debounce();
    let mut playground = Playground::new(config).expect("valid config");
    visualize_stdout(&playground.view());

    // Switch to bitcoin-style transactions and grow the list.
    playground.set_context(ContextMode::Bitcoin);
    while playground.add_item().is_ok() {}
    info!(items = playground.items().len(), "item limit reached");

    // Rebuild off the main thread after the debounce delay.
    let ticket = playground.begin_rebuild();
    let built = thread::spawn(move || {
        thread::sleep(debounce);
        ticket.build()
    })
    .join()
    .expect("build thread");
    info!(hashes = built.cost().total_hash_calls(), "rebuild finished");
    playground.complete(built);

    // Select a leaf: its proof path lights up.
    let proof = playground.select_leaf(5).expect("leaf 5 exists");
    visualize_stdout(&playground.view());
    visualize_stdout(&proof);

    // Tamper with the same leaf. Until the rebuild lands the old proof fails.
    playground
        .update_item(5, "Tx: deadbeef")
        .expect("leaf 5 exists");
    println!(
        "edited item verifies against the old root: {}",
        playground.verify_item(5).expect("leaf 5 exists")
    );
    playground.rebuild_now();
    println!("tampered path after rebuild:");
    visualize_stdout(&playground.view());

    let report = playground.efficiency();
    println!(
        "{} items: naive download {} hashes, proof {} hashes",
        report.items, report.naive_hashes, report.proof_hashes
    );
}
