use socktab::{resolve_owner, OwnerIndex};

fn main() -> socktab::Result<()> {
    env_logger::init();

    // One walk of /proc indexes every visible socket descriptor
    let index = OwnerIndex::scan();
    println!("Indexed {} socket descriptors", index.len());

    // Established connections, resolved one at a time
    let entries = socktab::tcp()?;
    let established: Vec<_> = entries
        .iter()
        .filter(|entry| entry.is_established())
        .collect();
    println!("\n{} established TCP connections:", established.len());

    for entry in established {
        let owner = resolve_owner(entry.inode, entry.uid);
        match owner.pid {
            Some(pid) => println!("  {entry} -> pid {pid}"),
            None => println!("  {entry} (no visible owner)"),
        }
    }

    // The index answers the same question without re-walking /proc
    if let Some(listener) = entries.iter().find(|entry| entry.is_listening()) {
        let owner = index.owner(listener.inode, listener.uid);
        println!("\nFirst listener: {listener}");
        println!("  resolved owner: {owner}");
    }

    Ok(())
}
