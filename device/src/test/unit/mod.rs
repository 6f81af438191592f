mod allocator;
