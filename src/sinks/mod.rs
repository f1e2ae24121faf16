pub mod epub;
