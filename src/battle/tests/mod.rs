pub mod common;

#[cfg(test)]
mod test_resolve_turn;


#[cfg(test)]
mod test_action_prevention;

#[cfg(test)]
mod test_switching;
