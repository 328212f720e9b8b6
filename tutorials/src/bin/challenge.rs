use merklelab_playground::{InspectOutcome, Playground, PlaygroundConfig};
use merklelab_visualize::{visualize_stdout, DebugDigest};

fn main() {
    tutorials::init_tracing();

    let mut playground = Playground::new(PlaygroundConfig::default()).expect("valid config");
    let mut challenge = playground.start_challenge().expect("challenge starts");
    println!(
        "{} shards, one is corrupted. Best possible: {} inspections.",
        challenge.leaf_count(),
        challenge.optimal_clicks()
    );
    println!(
        "trusted root {:?}, received root {:?}",
        DebugDigest(challenge.trusted_root().to_owned()),
        DebugDigest(challenge.received().root_digest().unwrap_or_default().to_owned())
    );

    // Walk down from the root, always following the broken child.
    let mut current = challenge.received().root_id().expect("tree has leaves");
    let mut outcome = challenge.inspect(current).expect("root is known");
    while outcome == InspectOutcome::Broken {
        let node = challenge.received().node(current).expect("known node");
        let left = node.left_child().expect("internal node");
        let right = node.right_child().expect("internal node");
        current = left;
        outcome = challenge.inspect(left).expect("known node");
        if outcome == InspectOutcome::Clean {
            current = right;
            outcome = challenge.inspect(right).expect("known node");
        }
    }

    visualize_stdout(&challenge.view());
    println!(
        "found shard {} in {} inspections",
        challenge.corrupted_index(),
        challenge.clicks()
    );
}
