pub fn run() -> anyhow::Result<()> {
    println!("devpulse {}", env!("CARGO_PKG_VERSION"));
    println!("GitHub activity, suggestions and productivity in the terminal");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_output() {
        let result = run();
        assert!(result.is_ok());
    }
}
