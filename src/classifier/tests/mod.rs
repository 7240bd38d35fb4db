//! Tests for line classification and record typing
