/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use slog::{Logger, Record, Serializer, Value, slog_info};
use uuid::Uuid;

use crate::ForwardSummary;

struct LtUuid<'a>(&'a Uuid);

impl Value for LtUuid<'_> {
    fn serialize(
        &self,
        _record: &Record,
        key: slog::Key,
        serializer: &mut dyn Serializer,
    ) -> slog::Result {
        serializer.emit_arguments(key, &format_args!("{}", self.0.simple()))
    }
}

pub(crate) struct TaskLogForForwarder<'a> {
    pub(crate) logger: &'a Logger,
    pub(crate) task_id: &'a Uuid,
    pub(crate) dest_host: Option<&'a str>,
    pub(crate) summary: &'a ForwardSummary,
}

impl TaskLogForForwarder<'_> {
    pub(crate) fn log(&self) {
        let summary = self.summary;
        slog_info!(self.logger, "";
            "task_type" => "TunnelForward",
            "task_id" => LtUuid(self.task_id),
            "direction" => summary.direction.as_str(),
            "dest_host" => self.dest_host,
            "rd_bytes" => summary.read_bytes,
            "wr_bytes" => summary.forwarded_bytes,
            "is_http" => summary.is_http,
            "http_requests" => summary.http_requests,
            "http_responses" => summary.http_responses,
            "page_views" => summary.page_views,
            "scan_abandon" => summary.scan_abandon.as_ref().map(|r| r.to_string()),
            "reason" => summary.error.as_ref().map(|e| e.to_string()),
        )
    }
}
