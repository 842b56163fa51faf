//! Event store database schema.

/// SQL to create the events table.
///
/// `(stream_id, version)` is the primary key and doubles as the optimistic
/// concurrency backstop: even if two writers pass the in-transaction
/// version check simultaneously, only one insert of a given version can
/// succeed.
pub const CREATE_EVENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS wallet_events (
    stream_id   UUID NOT NULL,
    version     INTEGER NOT NULL,
    event_type  VARCHAR(200) NOT NULL,
    payload     JSONB NOT NULL,
    metadata    JSONB NOT NULL DEFAULT '{}',
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    event_id    UUID NOT NULL,
    PRIMARY KEY (stream_id, version),
    CONSTRAINT wallet_events_version_non_negative CHECK (version >= 0)
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_wallet_events_event_id
    ON wallet_events (event_id);
";
