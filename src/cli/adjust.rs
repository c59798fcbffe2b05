/// Direction of a stepwise property change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Step actually applied for a property with step size `step_size`.
///
/// Without a request the property's own step is used. A requested step
/// that is not a multiple of the step size is rounded up to the next
/// multiple. Non-positive step sizes count as 1.
pub fn effective_step(step_size: i32, requested: Option<i32>) -> i32 {
    let step_size = step_size.max(1);
    match requested {
        None => step_size,
        Some(r) if r % step_size == 0 => r,
        Some(r) => (r / step_size).saturating_add(1).saturating_mul(step_size),
    }
}

/// Move `current` by `step` in `direction`, clamped to the property range.
///
/// Bounds are ordered before clamping so that devices reporting an
/// inverted range cannot cause a panic.
pub fn adjusted_value(current: i32, step: i32, direction: Direction, min: i32, max: i32) -> i32 {
    let target = match direction {
        Direction::Up => current.saturating_add(step),
        Direction::Down => current.saturating_sub(step),
    };
    target.clamp(min.min(max), min.max(max))
}
