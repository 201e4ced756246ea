mod helpers;

mod events;
mod lifecycle;
mod retry;
