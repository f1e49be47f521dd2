#[macro_use]
extern crate criterion;

use criterion::black_box;
use criterion::Criterion;

fn criterion_benchmark(c: &mut Criterion) {
    let test_asm = "\
# exercise every format class\n\
start:  addi $t0, $zero, 0\n\
        addi $t1, $zero, 64\n\
loop:   beq $t0, $t1, done\n\
        lw $t2, 4($sp)\n\
        add $t3, $t2, $t0\n\
        sub $t4, $t3, $t1\n\
        and $t5, $t4, $t3\n\
        or $t6, $t5, $t4\n\
        nor $t7, $t6, $t5\n\
        slt $s0, $t7, $t6\n\
        sll $s1, $s0, 2\n\
        sw $s1, 8($sp)\n\
        addi $t0, $t0, 1\n\
        j loop\n\
done:   jr $ra\n";

    c.bench_function("assemble_loop", |b| {
        b.iter(|| mipsasm::asm::assemble(black_box(test_asm)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
