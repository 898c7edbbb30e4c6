pub(crate) fn enabled() -> bool {
    std::env::var("IPMI_DEBUG")
        .map(|v| !v.is_empty())
        .unwrap_or(false)
}

/// Hex-dump a request or response payload when `IPMI_DEBUG` is set.
pub(crate) fn dump_hex(label: &str, command: &str, bytes: &[u8]) {
    if !enabled() {
        return;
    }
    let mut out = String::with_capacity(label.len() + command.len() + bytes.len() * 3 + 8);
    out.push_str(label);
    out.push_str(" [");
    out.push_str(command);
    out.push_str("] (");
    out.push_str(&bytes.len().to_string());
    out.push_str("):");
    for b in bytes {
        out.push(' ');
        out.push_str(&hex::encode([*b]));
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("{out}");

    #[cfg(not(feature = "tracing"))]
    eprintln!("{out}");
}
