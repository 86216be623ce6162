//! Register naming.
//!
//! Maps the MIPS-style ABI names accepted by the assembler to register-file indices.
//! Floating-point registers `$f0..$f15` follow the 32 general registers in the same file.

/// Register `$0` (hard-wired zero).
pub const REG_ZERO: usize = 0;
/// Index of `$f0`, the first floating-point register.
pub const FP_BASE: usize = 32;
/// Number of general-purpose registers.
pub const GPR_COUNT: usize = 32;
/// Number of floating-point registers.
pub const FPR_COUNT: usize = 16;

/// ABI names of `$0..$31`, in index order.
const GPR_NAMES: [&str; GPR_COUNT] = [
    "zero", "at", "v0", "v1", "a0", "a1", "a2", "a3", "t0", "t1", "t2", "t3", "t4", "t5", "t6",
    "t7", "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "t8", "t9", "k0", "k1", "gp", "sp",
    "fp", "ra",
];

/// Resolves a register operand (`$7`, `$f2`, `$sp`) to its register-file index.
///
/// # Returns
///
/// `None` when the token is not a register name.
pub fn register_index(token: &str) -> Option<usize> {
    let name = token.trim().strip_prefix('$')?;
    if name.is_empty() {
        return None;
    }
    if name.bytes().all(|b| b.is_ascii_digit()) {
        return name.parse::<usize>().ok().filter(|&n| n < GPR_COUNT);
    }
    if let Some(num) = name.strip_prefix('f') {
        if !num.is_empty() && num.bytes().all(|b| b.is_ascii_digit()) {
            return num
                .parse::<usize>()
                .ok()
                .filter(|&n| n < FPR_COUNT)
                .map(|n| FP_BASE + n);
        }
    }
    GPR_NAMES.iter().position(|&abi| abi == name)
}

/// Returns the display name of a register index (`$t0`, `$f3`), if it has one.
pub fn register_name(idx: usize) -> Option<String> {
    if idx < GPR_COUNT {
        Some(format!("${}", GPR_NAMES[idx]))
    } else if idx < FP_BASE + FPR_COUNT {
        Some(format!("$f{}", idx - FP_BASE))
    } else {
        None
    }
}
