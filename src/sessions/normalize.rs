/// Canonical cache key for a task: trimmed, lowercased, and with every
/// whitespace run collapsed to a single space.
///
/// The cache never calls this itself; callers must apply it the same way on
/// every write and lookup.
pub fn normalize_task(task: &str) -> String {
    task.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
