/// Integration test suite: file-backed storage, the JSON-RPC surface and
/// competing connections
mod basic_integration;
mod concurrency;
