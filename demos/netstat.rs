use socktab::{enrich_owners, Protocol, SocketEntry};

fn main() -> socktab::Result<()> {
    env_logger::init();

    // Dump all four kernel tables, netstat-style
    for protocol in Protocol::ALL {
        let mut entries = socktab::snapshot(protocol)?;
        enrich_owners(&mut entries);
        print_table(protocol, &entries);
    }

    Ok(())
}

fn print_table(protocol: Protocol, entries: &[SocketEntry]) {
    println!("\n{protocol}: {} sockets", entries.len());
    println!(
        "{:<28} {:<28} {:<12} {:>6}  {}",
        "Local Address", "Remote Address", "State", "UID", "Owner"
    );

    for entry in entries {
        let owner = entry
            .owner
            .as_ref()
            .map_or_else(|| "-".to_string(), ToString::to_string);
        println!(
            "{:<28} {:<28} {:<12} {:>6}  {owner}",
            entry.local.to_string(),
            entry.remote.to_string(),
            entry.state.as_str(),
            entry.uid,
        );
    }
}
