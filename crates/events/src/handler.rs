/// Execute an aggregate command deterministically (no IO, no side effects).
///
/// 1. **Decide**: calls `aggregate.handle(command)` to get events (no mutation)
/// 2. **Evolve**: applies each event via `aggregate.apply(event)`
///
/// On error nothing has been applied, so the aggregate is left exactly as it
/// was. Callers that must run a side effect between the two steps (e.g. a
/// payment) call `handle` and `apply` themselves instead.
pub fn execute<A>(aggregate: &mut A, command: &A::Command) -> Result<Vec<A::Event>, A::Error>
where
    A: bazaar_core::Aggregate,
{
    let events = A::handle(aggregate, command)?;
    for ev in &events {
        A::apply(aggregate, ev);
    }
    Ok(events)
}
