use merklelab::{verify_proof, MerkleTree};
use merklelab_visualize::visualize_stdout;
use tracing::info;

fn main() {
    tutorials::init_tracing();

    // Build a tree over four transactions. Digests are SHA-256 hex strings.
    let items = ["TX_ALPHA", "TX_BETA", "TX_GAMMA", "TX_DELTA"];
    let tree = MerkleTree::build(items);
    let root = tree.root_digest().expect("tree has leaves");
    info!(root, levels = tree.height(), "built tree");

    // Draw the tree, highlighting what a verifier of TX_GAMMA looks at.
    let highlighted = tree.proof_path_ids(2).expect("leaf 2 exists");
    visualize_stdout(&merklelab::TreeView::new(&tree, &highlighted));

    // Generate the inclusion proof for TX_GAMMA.
    let proof = tree.proof(2).expect("leaf 2 exists");
    visualize_stdout(&proof);

    // The proof is compact on the wire.
    let bytes = proof.encode_to_vec().expect("proof encodes");
    println!("encoded proof: {} bytes", bytes.len());

    // Anyone holding only the root can now check membership.
    println!("Does TX_GAMMA belong to the tree?");
    if verify_proof("TX_GAMMA", &proof.steps, root) {
        println!("Yes");
    } else {
        println!("No");
    }

    // A forged payload fails against the same proof.
    println!("Does TX_OMEGA belong to the tree?");
    if verify_proof("TX_OMEGA", &proof.steps, root) {
        println!("Yes");
    } else {
        println!("No");
    }

    // With an odd number of items the last one is paired with itself.
    let odd = MerkleTree::build(["A", "B", "C"]);
    let odd_root = odd.root_digest().expect("tree has leaves");
    let odd_proof = odd.proof(2).expect("leaf 2 exists");
    visualize_stdout(&odd);
    println!(
        "C verifies through the self-paired node: {}",
        odd_proof.verify("C", odd_root)
    );
}
