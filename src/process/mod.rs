//! Correlation of socket inodes to owning processes.
//!
//! The kernel exposes every process's open descriptors as symlinks under
//! `/proc/<pid>/fd`, and a socket descriptor's link target reads
//! `socket:[INODE]`. Scanning that namespace maps a socket-table row back to
//! the process holding it open. The namespace is volatile and partially
//! unreadable (other users' processes), so every resolution step degrades to
//! a placeholder instead of failing.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use nix::unistd::{Uid, User};

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

use crate::PROC_ROOT;

/// Identity of the process holding a socket open.
///
/// Every field is optional: correlation is best-effort and each field
/// degrades independently when its resolution step fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct SocketOwner {
    /// Owning process id
    pub pid: Option<u32>,
    /// User name for the table row's uid
    pub user: Option<String>,
    /// Target of the process's `exe` link
    pub exe: Option<PathBuf>,
    /// Display name: last path segment of `exe`, first character upper-cased
    pub name: Option<String>,
}

impl std::fmt::Display for SocketOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.pid {
            Some(pid) => write!(f, "pid={pid}")?,
            None => write!(f, "pid=-")?,
        }
        if let Some(name) = &self.name {
            write!(f, " ({name})")?;
        }
        match &self.user {
            Some(user) => write!(f, " user={user}"),
            None => write!(f, " user=-"),
        }
    }
}

/// Inode-keyed index over one walk of the descriptor namespace.
///
/// Built once per snapshot and reused across records, so enriching N entries
/// costs one /proc walk instead of N. The index is immutable once built and
/// meant to be discarded at the end of the call; the process set it observed
/// goes stale immediately.
#[derive(Debug)]
pub struct OwnerIndex {
    root: PathBuf,
    by_inode: HashMap<u64, u32>,
}

impl OwnerIndex {
    /// Walks `/proc` once and indexes every socket descriptor by inode.
    ///
    /// Unreadable process directories (permission denied, process exited
    /// mid-scan) are skipped; on duplicate inodes the first match in walk
    /// order wins.
    #[must_use]
    pub fn scan() -> Self {
        Self::scan_at(PROC_ROOT)
    }

    pub(crate) fn scan_at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let by_inode = scan_descriptors(&root, None);
        Self { root, by_inode }
    }

    /// Number of distinct socket inodes observed by the walk
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_inode.len()
    }

    /// Returns true when the walk saw no socket descriptors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_inode.is_empty()
    }

    /// The pid holding `inode` open, if the walk saw one
    #[must_use]
    pub fn pid_of(&self, inode: u64) -> Option<u32> {
        self.by_inode.get(&inode).copied()
    }

    /// Resolves the full owner identity for one table row.
    ///
    /// Inode 0 (ownerless rows such as TIME_WAIT) never matches a
    /// descriptor; the uid is still looked up.
    #[must_use]
    pub fn owner(&self, inode: u64, uid: u32) -> SocketOwner {
        owner_details(&self.root, self.pid_of(inode), uid)
    }
}

/// Resolves the owner of a single socket inode with a fresh walk.
///
/// Stops at the first matching descriptor. For whole-snapshot enrichment
/// prefer [`OwnerIndex`], which amortizes the walk across all records.
#[must_use]
pub fn resolve_owner(inode: u64, uid: u32) -> SocketOwner {
    resolve_owner_at(Path::new(PROC_ROOT), inode, uid)
}

pub(crate) fn resolve_owner_at(root: &Path, inode: u64, uid: u32) -> SocketOwner {
    let pid = if inode == 0 {
        None
    } else {
        scan_descriptors(root, Some(inode)).get(&inode).copied()
    };
    owner_details(root, pid, uid)
}

/// One pass over `<root>/<pid>/fd`; stops early when `target` is found.
fn scan_descriptors(root: &Path, target: Option<u64>) -> HashMap<u64, u32> {
    let mut by_inode = HashMap::new();

    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("cannot enumerate {}: {err}", root.display());
            return by_inode;
        }
    };

    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let pid = match file_name.to_str().and_then(|name| name.parse::<u32>().ok()) {
            Some(pid) => pid,
            None => continue,
        };

        let fd_dir = match fs::read_dir(entry.path().join("fd")) {
            Ok(fd_dir) => fd_dir,
            Err(err) => {
                debug!("skipping pid {pid}: {err}");
                continue;
            }
        };

        for fd_entry in fd_dir.flatten() {
            if let Ok(link) = fs::read_link(fd_entry.path()) {
                if let Some(inode) = socket_inode(&link.to_string_lossy()) {
                    by_inode.entry(inode).or_insert(pid);
                    if target == Some(inode) {
                        return by_inode;
                    }
                }
            }
        }
    }

    by_inode
}

fn owner_details(root: &Path, pid: Option<u32>, uid: u32) -> SocketOwner {
    let exe = pid.and_then(|pid| fs::read_link(root.join(pid.to_string()).join("exe")).ok());
    let name = exe.as_deref().and_then(display_name);
    SocketOwner {
        pid,
        user: user_name(uid),
        exe,
        name,
    }
}

/// Socket descriptor targets render as `socket:[INODE]`.
fn socket_inode(target: &str) -> Option<u64> {
    target
        .strip_prefix("socket:[")?
        .strip_suffix(']')?
        .parse()
        .ok()
}

/// Last path segment with its first character upper-cased.
fn display_name(exe: &Path) -> Option<String> {
    let file_name = exe.file_name()?.to_string_lossy();
    let mut chars = file_name.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}

/// Owner user name for a table row's uid, if the user database knows it.
fn user_name(uid: u32) -> Option<String> {
    User::from_uid(Uid::from_raw(uid))
        .ok()
        .flatten()
        .map(|user| user.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    // A uid that no user database assigns: (uid_t)-1 is reserved.
    const NO_SUCH_UID: u32 = u32::MAX;

    fn fake_proc() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let fd_dir = dir.path().join("1234/fd");
        fs::create_dir_all(&fd_dir).unwrap();
        symlink("socket:[99999]", fd_dir.join("5")).unwrap();
        symlink("pipe:[4242]", fd_dir.join("6")).unwrap();
        symlink("/dev/null", fd_dir.join("7")).unwrap();
        symlink("/usr/sbin/nginx", dir.path().join("1234/exe")).unwrap();
        fs::create_dir_all(dir.path().join("sys")).unwrap();
        fs::write(dir.path().join("uptime"), "1.0 1.0\n").unwrap();
        dir
    }

    #[test]
    fn scan_indexes_socket_descriptors_only() {
        let dir = fake_proc();
        let index = OwnerIndex::scan_at(dir.path());
        assert_eq!(index.len(), 1);
        assert_eq!(index.pid_of(99999), Some(1234));
        assert_eq!(index.pid_of(4242), None);
        assert_eq!(index.pid_of(77777), None);
    }

    #[test]
    fn owner_resolves_exe_and_display_name() {
        let dir = fake_proc();
        let index = OwnerIndex::scan_at(dir.path());
        let owner = index.owner(99999, NO_SUCH_UID);
        assert_eq!(owner.pid, Some(1234));
        assert_eq!(owner.exe.as_deref(), Some(Path::new("/usr/sbin/nginx")));
        assert_eq!(owner.name.as_deref(), Some("Nginx"));
        assert_eq!(owner.user, None);
    }

    #[test]
    fn unmatched_inode_degrades_every_field() {
        let dir = fake_proc();
        let index = OwnerIndex::scan_at(dir.path());
        let owner = index.owner(31337, NO_SUCH_UID);
        assert_eq!(owner, SocketOwner::default());
        assert_eq!(owner.to_string(), "pid=- user=-");
    }

    #[test]
    fn one_shot_resolution_matches_the_index() {
        let dir = fake_proc();
        let index = OwnerIndex::scan_at(dir.path());
        let one_shot = resolve_owner_at(dir.path(), 99999, NO_SUCH_UID);
        assert_eq!(one_shot, index.owner(99999, NO_SUCH_UID));
    }

    #[test]
    fn inode_zero_never_matches() {
        let dir = fake_proc();
        let owner = resolve_owner_at(dir.path(), 0, NO_SUCH_UID);
        assert_eq!(owner.pid, None);
    }

    #[test]
    fn duplicate_descriptors_keep_one_entry() {
        let dir = fake_proc();
        // dup()ed descriptor: same socket behind two fds
        symlink("socket:[99999]", dir.path().join("1234/fd/8")).unwrap();
        let index = OwnerIndex::scan_at(dir.path());
        assert_eq!(index.len(), 1);
        assert_eq!(index.pid_of(99999), Some(1234));
    }

    #[test]
    fn missing_exe_link_degrades_name_but_keeps_pid() {
        let dir = tempfile::tempdir().unwrap();
        let fd_dir = dir.path().join("42/fd");
        fs::create_dir_all(&fd_dir).unwrap();
        symlink("socket:[555]", fd_dir.join("3")).unwrap();

        let owner = OwnerIndex::scan_at(dir.path()).owner(555, NO_SUCH_UID);
        assert_eq!(owner.pid, Some(42));
        assert_eq!(owner.exe, None);
        assert_eq!(owner.name, None);
        assert_eq!(owner.to_string(), "pid=42 user=-");
    }

    #[test]
    fn unreadable_root_yields_an_empty_index() {
        let index = OwnerIndex::scan_at("/definitely/not/a/proc/root");
        assert!(index.is_empty());
        let owner = index.owner(99999, NO_SUCH_UID);
        assert_eq!(owner.pid, None);
    }

    #[test]
    fn socket_inode_parses_only_the_bracketed_form() {
        assert_eq!(socket_inode("socket:[123]"), Some(123));
        assert_eq!(socket_inode("socket:[0]"), Some(0));
        assert_eq!(socket_inode("socket:[]"), None);
        assert_eq!(socket_inode("socket:[12a]"), None);
        assert_eq!(socket_inode("socket:123]"), None);
        assert_eq!(socket_inode("socket:[123"), None);
        assert_eq!(socket_inode("pipe:[123]"), None);
        assert_eq!(socket_inode("/dev/null"), None);
    }

    #[test]
    fn display_name_upper_cases_the_first_character() {
        assert_eq!(
            display_name(Path::new("/usr/bin/sshd")).as_deref(),
            Some("Sshd")
        );
        assert_eq!(display_name(Path::new("nginx")).as_deref(), Some("Nginx"));
        assert_eq!(
            display_name(Path::new("/opt/app/2waysync")).as_deref(),
            Some("2waysync")
        );
        assert_eq!(display_name(Path::new("/")), None);
    }

    #[test]
    fn display_shows_name_between_pid_and_user() {
        let owner = SocketOwner {
            pid: Some(812),
            user: Some("lp".to_string()),
            exe: Some(PathBuf::from("/usr/sbin/cupsd")),
            name: Some("Cupsd".to_string()),
        };
        assert_eq!(owner.to_string(), "pid=812 (Cupsd) user=lp");
    }
}
