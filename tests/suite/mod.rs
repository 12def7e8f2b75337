mod page;
mod ready;
