//! Kernel-side syscall tracing, selected by a bitmask of syscall numbers.

use nix::errno::Errno;
use tracing::{debug, trace};

use crate::error::{Error, Result};

#[cfg(target_arch = "aarch64")]
use crate::aarch64 as arch;

#[cfg(target_arch = "x86_64")]
use crate::x86 as arch;

/// Bitmask of traced syscalls. Bit `i` selects syscall number `i`.
pub type TraceMask = u64;

/// Audit arch of the running kernel ABI, as seen in `seccomp_data.arch`.
pub const NATIVE_AUDIT_ARCH: u32 = arch::AUDIT_ARCH;

/// Defined in `include/uapi/linux/seccomp.h`.
const SECCOMP_RET_ALLOW: u32 = 0x7fff_0000;
const SECCOMP_RET_LOG: u32 = 0x7ffc_0000;

/// Offsets into `struct seccomp_data`.
const SECCOMP_DATA_NR: u32 = 0;
const SECCOMP_DATA_ARCH: u32 = 4;

/// Classic BPF opcodes, from `include/uapi/linux/bpf_common.h`.
const BPF_LD: u16 = 0x00;
const BPF_W: u16 = 0x00;
const BPF_ABS: u16 = 0x20;
const BPF_JMP: u16 = 0x05;
const BPF_JEQ: u16 = 0x10;
const BPF_K: u16 = 0x00;
const BPF_RET: u16 = 0x06;
const BPF_MAXINSNS: usize = 4096;

/// Something that can turn on syscall tracing for the current process.
///
/// Tracing state is process-wide and is inherited across `execve()`.
pub trait TraceController {
    fn enable(&mut self, mask: TraceMask) -> Result<()>;
}

impl<T: TraceController + ?Sized> TraceController for &mut T {
    fn enable(&mut self, mask: TraceMask) -> Result<()> {
        (**self).enable(mask)
    }
}

/// [`TraceController`] that asks the kernel to audit-log the selected syscalls.
///
/// Installs a seccomp filter returning `SECCOMP_RET_LOG` for every syscall whose bit is
/// set, and `SECCOMP_RET_ALLOW` otherwise.
///
/// Without `CAP_SYS_ADMIN` the kernel only accepts the filter once `no_new_privs` is set,
/// so set-user-ID programs exec'd afterwards run without their elevated privileges.
///
/// Filters stack and cannot be removed. A second `enable()`, including one from a nested
/// launcher after `exec`, adds its syscalls to those already logged: the effective mask
/// is the union of every mask enabled so far, and `enable(0)` does not clear it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SeccompTrace {
    audit_arch: u32,
}

impl SeccompTrace {
    pub fn new() -> Self {
        let audit_arch = NATIVE_AUDIT_ARCH;

        Self { audit_arch }
    }
}

impl Default for SeccompTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceController for SeccompTrace {
    fn enable(&mut self, mask: TraceMask) -> Result<()> {
        if mask == 0 {
            debug!("empty trace mask, not installing a filter");
            return Ok(());
        }

        debug!(mask, syscalls = ?selected_syscalls(mask), "enabling syscall trace");

        let filter = filter_for_mask(mask, self.audit_arch);
        install(&filter).map_err(|source| Error::Trace { mask, source })
    }
}

/// Name of syscall `nr` on the running architecture, if it is addressable by a mask.
pub fn syscall_name(nr: u32) -> Option<&'static str> {
    arch::SYSCALL_NAMES.get(nr as usize).copied()
}

/// Names of the syscalls selected by `mask`, in ascending syscall number order.
pub fn selected_syscalls(mask: TraceMask) -> Vec<&'static str> {
    set_bits(mask).filter_map(syscall_name).collect()
}

fn set_bits(mask: TraceMask) -> impl Iterator<Item = u32> {
    (0..TraceMask::BITS).filter(move |bit| mask & (1 << bit) != 0)
}

/// A classic BPF instruction, laid out like `struct sock_filter`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Insn {
    pub code: u16,
    pub jt: u8,
    pub jf: u8,
    pub k: u32,
}

impl Insn {
    fn stmt(code: u16, k: u32) -> Self {
        Self { code, jt: 0, jf: 0, k }
    }

    fn jump(code: u16, k: u32, jt: u8, jf: u8) -> Self {
        Self { code, jt, jf, k }
    }
}

impl From<Insn> for libc::sock_filter {
    fn from(insn: Insn) -> Self {
        libc::sock_filter {
            code: insn.code,
            jt: insn.jt,
            jf: insn.jf,
            k: insn.k,
        }
    }
}

/// Build the seccomp program that logs each syscall selected by `mask`.
///
/// Layout, for `n` selected syscalls:
///
/// ```text
/// 0       ld  [arch]
/// 1       jeq #audit_arch, 0, allow
/// 2       ld  [nr]
/// 3..3+n  jeq #syscall, log, 0
/// 3+n     ret #ALLOW
/// 4+n     ret #LOG
/// ```
pub fn filter_for_mask(mask: TraceMask, audit_arch: u32) -> Vec<Insn> {
    let selected: Vec<u32> = set_bits(mask).collect();

    // At most 64 selected syscalls, so every jump offset fits in a `u8`.
    let n = selected.len() as u8;

    let mut filter = Vec::with_capacity(selected.len() + 5);

    filter.push(Insn::stmt(BPF_LD | BPF_W | BPF_ABS, SECCOMP_DATA_ARCH));
    filter.push(Insn::jump(BPF_JMP | BPF_JEQ | BPF_K, audit_arch, 0, n + 1));
    filter.push(Insn::stmt(BPF_LD | BPF_W | BPF_ABS, SECCOMP_DATA_NR));

    for (k, nr) in selected.into_iter().enumerate() {
        filter.push(Insn::jump(BPF_JMP | BPF_JEQ | BPF_K, nr, n - k as u8, 0));
    }

    filter.push(Insn::stmt(BPF_RET | BPF_K, SECCOMP_RET_ALLOW));
    filter.push(Insn::stmt(BPF_RET | BPF_K, SECCOMP_RET_LOG));

    filter
}

/// Check the program shape the kernel would reject, before any process state changes.
fn check(filter: &[Insn]) -> nix::Result<()> {
    if filter.is_empty() || filter.len() > BPF_MAXINSNS {
        return Err(Errno::EINVAL);
    }

    for (i, insn) in filter.iter().enumerate() {
        if insn.code == BPF_JMP | BPF_JEQ | BPF_K {
            let rest = filter.len() - i - 1;

            if insn.jt as usize >= rest || insn.jf as usize >= rest {
                return Err(Errno::EINVAL);
            }
        }
    }

    match filter.last() {
        Some(insn) if insn.code == BPF_RET | BPF_K => Ok(()),
        _ => Err(Errno::EINVAL),
    }
}

/// Install `filter` for the calling thread and its future exec'd images.
///
/// `no_new_privs` is set only if the kernel refuses the filter without it, i.e. the caller
/// lacks `CAP_SYS_ADMIN`. The flag cannot be cleared once set.
fn install(filter: &[Insn]) -> nix::Result<()> {
    check(filter)?;

    let mut filter: Vec<libc::sock_filter> = filter.iter().copied().map(Into::into).collect();

    let prog = libc::sock_fprog {
        len: filter.len() as libc::c_ushort,
        filter: filter.as_mut_ptr(),
    };

    trace!(len = prog.len, "installing seccomp filter");

    match set_seccomp(&prog) {
        Err(Errno::EACCES) => {
            debug!("filter refused without no_new_privs, setting it and retrying");
            set_no_new_privs()?;
            set_seccomp(&prog)
        },
        res => res,
    }
}

fn set_seccomp(prog: &libc::sock_fprog) -> nix::Result<()> {
    // SAFETY: `prog` points at a live filter for the duration of the call. The kernel
    // copies the program before returning.
    let res = unsafe {
        libc::prctl(
            libc::PR_SET_SECCOMP,
            libc::SECCOMP_MODE_FILTER as libc::c_ulong,
            prog as *const libc::sock_fprog,
            0 as libc::c_ulong,
            0 as libc::c_ulong,
        )
    };
    Errno::result(res)?;

    Ok(())
}

fn set_no_new_privs() -> nix::Result<()> {
    let res = unsafe {
        libc::prctl(
            libc::PR_SET_NO_NEW_PRIVS,
            1 as libc::c_ulong,
            0 as libc::c_ulong,
            0 as libc::c_ulong,
            0 as libc::c_ulong,
        )
    };
    Errno::result(res)?;

    Ok(())
}
