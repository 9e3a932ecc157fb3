//! Error handling and exit codes.

use gcdlab_core::error::HarnessError;
use gcdlab_core::exit_codes;

/// Map a harness error to its process exit code.
#[must_use]
pub fn exit_code(err: &HarnessError) -> i32 {
    match err {
        HarnessError::BrokenBarrier => exit_codes::ERROR_BROKEN_BARRIER,
        HarnessError::Interrupted => exit_codes::ERROR_CANCELED,
        HarnessError::InvalidArgument(_) => exit_codes::ERROR_CONFIG,
        HarnessError::Computation(_) => exit_codes::ERROR_COMPUTATION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes() {
        assert_eq!(exit_code(&HarnessError::Interrupted), 130);
        assert_eq!(exit_code(&HarnessError::BrokenBarrier), 2);
        assert_eq!(exit_code(&HarnessError::Computation("boom".into())), 3);
        assert_eq!(exit_code(&HarnessError::InvalidArgument("bad".into())), 4);
    }
}
