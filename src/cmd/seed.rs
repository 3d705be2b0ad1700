//! Seed command CLI handler.

use doc_factory::identity::IdentityGenerator;

pub fn run(common_seed: u64, parent: &str, count: usize) -> anyhow::Result<()> {
    let identity = IdentityGenerator::new();
    let parent_id = identity.adopt_identifier(parent)?;

    for _ in 0..count {
        println!("{}", identity.deterministic_seed(common_seed, &parent_id));
    }
    Ok(())
}
