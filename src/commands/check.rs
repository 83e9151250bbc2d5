//! Check command implementation.

use anyhow::Result;

use crate::error::EdlError;
use crate::validation::parse_address;

/// Run the check command
pub fn run(address: &str) -> Result<()> {
    let address = address.trim();
    let net = parse_address(address).map_err(|_| EdlError::InvalidAddress(address.to_string()))?;

    println!();
    if !address.contains('/') {
        println!("{} is a VALID host address", address);
    } else {
        println!("{} is a VALID network ({})", address, net.trunc());
    }
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_valid() {
        assert!(run("10.0.0.1").is_ok());
        assert!(run(" 10.0.0.5/24 ").is_ok());
        assert!(run("2001:db8::/32").is_ok());
    }

    #[test]
    fn test_check_invalid() {
        let err = run("not-an-ip").unwrap_err();
        assert!(err.to_string().contains("Invalid IP address"));
        assert!(run("").is_err());
    }
}
