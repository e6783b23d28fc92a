mod annotations;
mod nodes;
