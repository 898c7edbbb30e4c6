use std::time::Duration;

use crate::error::Error;

pub(crate) fn record_ok(
    command: &'static str,
    netfn: u8,
    cmd: u8,
    elapsed: Duration,
    completion_code: u8,
) {
    let _ = (command, netfn, cmd, elapsed, completion_code);

    #[cfg(feature = "metrics")]
    {
        metrics::counter!("ipmi_requests_total", "command" => command, "outcome" => "ok")
            .increment(1);
        metrics::histogram!("ipmi_request_seconds", "command" => command)
            .record(elapsed.as_secs_f64());
        if completion_code != 0x00 {
            metrics::counter!("ipmi_completion_code_nonzero_total", "command" => command)
                .increment(1);
        }
    }

    #[cfg(feature = "tracing")]
    {
        tracing::debug!(
            command,
            netfn,
            cmd,
            completion_code,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "ipmi request ok"
        );
    }
}

pub(crate) fn record_err(
    command: &'static str,
    netfn: u8,
    cmd: u8,
    elapsed: Duration,
    err: &Error,
) {
    let _ = (command, netfn, cmd, elapsed, err);

    #[cfg(feature = "metrics")]
    {
        metrics::counter!("ipmi_requests_total", "command" => command, "outcome" => "err")
            .increment(1);
        metrics::counter!(
            "ipmi_request_errors_total",
            "command" => command,
            "kind" => err.kind()
        )
        .increment(1);
        metrics::histogram!("ipmi_request_seconds", "command" => command)
            .record(elapsed.as_secs_f64());
    }

    #[cfg(feature = "tracing")]
    {
        tracing::warn!(
            command,
            netfn,
            cmd,
            error = %err,
            kind = err.kind(),
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "ipmi request failed"
        );
    }
}

pub(crate) fn record_retry(netfn: u8, cmd: u8, attempt: u32, retries: u32) {
    let _ = (netfn, cmd, attempt, retries);

    #[cfg(feature = "metrics")]
    metrics::counter!("ipmi_retries_total").increment(1);

    #[cfg(feature = "tracing")]
    tracing::debug!(netfn, cmd, attempt, retries, "request timed out, retrying");
}

pub(crate) fn record_reservation_lost(operation: &'static str, recoveries: u32) {
    let _ = (operation, recoveries);

    #[cfg(feature = "metrics")]
    metrics::counter!("ipmi_sel_reservation_lost_total", "operation" => operation).increment(1);

    #[cfg(feature = "tracing")]
    tracing::info!(
        operation,
        recoveries,
        "SEL reservation cancelled, re-reserving"
    );
}

pub(crate) fn record_clear_poll(poll: u32, completed: bool) {
    let _ = (poll, completed);

    #[cfg(feature = "metrics")]
    metrics::counter!("ipmi_sel_clear_polls_total").increment(1);

    #[cfg(feature = "tracing")]
    tracing::debug!(poll, completed, "SEL erasure progress");
}
