use socktab::{Protocol, SocketEntry};

fn main() -> socktab::Result<()> {
    env_logger::init();

    // Collect listening TCP sockets across both address families
    let mut listeners: Vec<SocketEntry> = Vec::new();
    for protocol in [Protocol::Tcp, Protocol::Tcp6] {
        let entries = socktab::snapshot_with_owners(protocol)?;
        listeners.extend(entries.into_iter().filter(SocketEntry::is_listening));
    }
    listeners.sort_by_key(SocketEntry::local_port);

    println!("{} listening TCP sockets:", listeners.len());
    for entry in &listeners {
        let program = entry
            .owner
            .as_ref()
            .and_then(|owner| owner.name.as_deref())
            .unwrap_or("-");
        println!(
            "  {:>5}/{:<5} {:<28} {program}",
            entry.local_port(),
            entry.protocol.as_str(),
            entry.local.to_string(),
        );
    }

    // UDP has no listen state; every bound socket reports CLOSE
    let mut datagrams = socktab::udp()?;
    datagrams.extend(socktab::udp6()?);
    println!("\n{} bound UDP sockets:", datagrams.len());
    for entry in &datagrams {
        println!(
            "  {:>5}/{:<5} {}",
            entry.local_port(),
            entry.protocol.as_str(),
            entry.local
        );
    }

    Ok(())
}
