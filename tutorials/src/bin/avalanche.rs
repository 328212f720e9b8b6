use merklelab::{
    diff::{avalanche_of, first_difference, TamperCheck, DEFAULT_AVALANCHE_PREFIX},
    efficiency::{log_scale_items, EfficiencyReport},
    HashAlgorithm,
};

fn main() {
    tutorials::init_tracing();
    let hasher = HashAlgorithm::Sha256;

    // Change one character and count how many digest bits flip.
    for (before, after) in [("TX_ALPHA", "TX_ALPHB"), ("hello", "Hello"), ("10 BTC", "90 BTC")] {
        let report = avalanche_of(&hasher, before, after, DEFAULT_AVALANCHE_PREFIX);
        println!(
            "{before:>10} -> {after:<10} {:>3}% of {} bits flipped",
            report.percent(),
            report.bits_compared
        );
    }

    // Spot where a received message departs from the original.
    let check = TamperCheck::new(&hasher, "Send 10 BTC to Alice", "Send 90 BTC to Alice");
    println!(
        "intact: {}, first difference: {:?}",
        check.is_intact(),
        check.first_difference
    );
    println!("{:?}", first_difference("Send 10 BTC", "Send 10 BTC to Bob"));

    // How proof size grows as the data set does.
    for slider in [0, 20, 40, 60, 80, 100] {
        let report = EfficiencyReport::for_items(log_scale_items(slider));
        println!(
            "{:>9} items -> {:>2} proof hashes",
            report.items, report.proof_hashes
        );
    }
}
