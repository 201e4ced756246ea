mod daemon;
mod node;
