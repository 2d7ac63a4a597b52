mod common;

use bfs::{BLOCK_SIZE, Error, Fd, MAX_FILE_SIZE, Whence};
use common::{formatted, pattern};

#[test]
fn write_then_read_back() {
    let mut fs = formatted();
    let fd = fs.create("data").unwrap();
    let data = pattern(3 * BLOCK_SIZE + 17);

    assert_eq!(fs.write(fd, &data).unwrap(), data.len());
    assert_eq!(fs.tell(fd).unwrap(), data.len());
    assert_eq!(fs.size(fd).unwrap(), data.len());

    fs.seek(fd, 0, Whence::Set).unwrap();
    let mut buf = vec![0; data.len()];
    assert_eq!(fs.read(fd, &mut buf).unwrap(), data.len());
    assert_eq!(buf, data);
    assert_eq!(fs.tell(fd).unwrap(), data.len());
}

#[test]
fn read_is_clamped_to_size() {
    let mut fs = formatted();
    let fd = fs.create("short").unwrap();
    fs.write(fd, b"hello world").unwrap();

    fs.seek(fd, 6, Whence::Set).unwrap();
    let mut buf = [0; 64];
    assert_eq!(fs.read(fd, &mut buf).unwrap(), 5);
    assert_eq!(&buf[..5], b"world");
    assert_eq!(fs.tell(fd).unwrap(), 11);
}

#[test]
fn read_at_or_past_eof_returns_zero() {
    let mut fs = formatted();
    let fd = fs.create("eof").unwrap();
    fs.write(fd, &pattern(100)).unwrap();

    let mut buf = [0; 16];
    assert_eq!(fs.read(fd, &mut buf).unwrap(), 0);
    assert_eq!(fs.tell(fd).unwrap(), 100);

    fs.seek(fd, 1000, Whence::Set).unwrap();
    assert_eq!(fs.read(fd, &mut buf).unwrap(), 0);
    assert_eq!(fs.tell(fd).unwrap(), 1000);
    assert_eq!(fs.size(fd).unwrap(), 100);
}

#[test]
fn read_spans_multiple_blocks() {
    let mut fs = formatted();
    let fd = fs.create("span").unwrap();
    let data = pattern(4 * BLOCK_SIZE);
    fs.write(fd, &data).unwrap();

    // 起止都不在块边界上，跨越三个块
    fs.seek(fd, 300, Whence::Set).unwrap();
    let mut buf = vec![0; 2 * BLOCK_SIZE + 100];
    assert_eq!(fs.read(fd, &mut buf).unwrap(), buf.len());
    assert_eq!(buf, data[300..300 + buf.len()]);
}

#[test]
fn split_writes_equal_one_write() {
    let data = pattern(1500);
    let (n1, start) = (700, 123);

    let mut split = formatted();
    let fd1 = split.create("f").unwrap();
    split.write(fd1, &pattern(start)).unwrap();
    split.write(fd1, &data[..n1]).unwrap();
    split.write(fd1, &data[n1..]).unwrap();

    let mut whole = formatted();
    let fd2 = whole.create("f").unwrap();
    whole.write(fd2, &pattern(start)).unwrap();
    whole.write(fd2, &data).unwrap();

    assert_eq!(split.tell(fd1).unwrap(), whole.tell(fd2).unwrap());
    assert_eq!(split.size(fd1).unwrap(), whole.size(fd2).unwrap());

    let mut a = vec![0; start + data.len()];
    let mut b = vec![0; start + data.len()];
    split.seek(fd1, 0, Whence::Set).unwrap();
    whole.seek(fd2, 0, Whence::Set).unwrap();
    split.read(fd1, &mut a).unwrap();
    whole.read(fd2, &mut b).unwrap();
    assert_eq!(a, b);
}

#[test]
fn write_across_block_boundary_preserves_neighbours() {
    let mut fs = formatted();
    let fd = fs.create("rmw").unwrap();
    fs.write(fd, &[0xAA; 2 * BLOCK_SIZE]).unwrap();

    fs.seek(fd, 400, Whence::Set).unwrap();
    assert_eq!(fs.write(fd, &[0x55; 600]).unwrap(), 600);
    assert_eq!(fs.size(fd).unwrap(), 2 * BLOCK_SIZE);

    fs.seek(fd, 0, Whence::Set).unwrap();
    let mut buf = vec![0; 2 * BLOCK_SIZE];
    fs.read(fd, &mut buf).unwrap();

    assert!(buf[..400].iter().all(|&b| b == 0xAA));
    // 第一块尾部 112 字节，第二块头部 488 字节
    assert!(buf[400..BLOCK_SIZE].iter().all(|&b| b == 0x55));
    assert!(buf[BLOCK_SIZE..1000].iter().all(|&b| b == 0x55));
    assert!(buf[1000..].iter().all(|&b| b == 0xAA));
}

#[test]
fn size_grows_but_never_shrinks() {
    let mut fs = formatted();
    let fd = fs.create("grow").unwrap();
    fs.write(fd, &pattern(1000)).unwrap();

    fs.seek(fd, 10, Whence::Set).unwrap();
    fs.write(fd, &pattern(20)).unwrap();
    assert_eq!(fs.size(fd).unwrap(), 1000);

    fs.seek(fd, 990, Whence::Set).unwrap();
    fs.write(fd, &pattern(50)).unwrap();
    assert_eq!(fs.size(fd).unwrap(), 1040);
}

#[test]
fn seek_past_eof_leaves_zero_gap() {
    let mut fs = formatted();
    let fd = fs.create("gap").unwrap();
    fs.write(fd, b"head").unwrap();

    // 跳过若干整块，中间的块不会分配
    fs.seek(fd, 3 * BLOCK_SIZE as i64, Whence::End).unwrap();
    assert_eq!(fs.size(fd).unwrap(), 4);
    fs.write(fd, b"tail").unwrap();

    let size = 4 + 3 * BLOCK_SIZE + 4;
    assert_eq!(fs.size(fd).unwrap(), size);

    fs.seek(fd, 0, Whence::Set).unwrap();
    let mut buf = vec![0xFF; size];
    assert_eq!(fs.read(fd, &mut buf).unwrap(), size);
    assert_eq!(&buf[..4], b"head");
    assert!(buf[4..size - 4].iter().all(|&b| b == 0));
    assert_eq!(&buf[size - 4..], b"tail");
}

#[test]
fn seek_modes() {
    let mut fs = formatted();
    let fd = fs.create("seek").unwrap();
    fs.write(fd, &pattern(100)).unwrap();

    fs.seek(fd, 0, Whence::Set).unwrap();
    assert_eq!(fs.tell(fd).unwrap(), 0);

    fs.seek(fd, 30, Whence::Cur).unwrap();
    fs.seek(fd, 12, Whence::Cur).unwrap();
    assert_eq!(fs.tell(fd).unwrap(), 42);

    fs.seek(fd, 5, Whence::End).unwrap();
    assert_eq!(fs.tell(fd).unwrap(), 105);

    fs.seek(fd, 0, Whence::Set).unwrap();
    assert_eq!(fs.tell(fd).unwrap(), 0);
}

#[test]
fn negative_seek_is_rejected() {
    let mut fs = formatted();
    let fd = fs.create("neg").unwrap();
    fs.write(fd, &pattern(10)).unwrap();

    for whence in [Whence::Set, Whence::Cur, Whence::End] {
        assert_eq!(fs.seek(fd, -1, whence), Err(Error::NegativeCursor));
    }
    assert_eq!(fs.tell(fd).unwrap(), 10);

    // 偏移量在描述符之前检查
    assert_eq!(
        fs.seek(Fd::from(999u32), -1, Whence::Set),
        Err(Error::NegativeCursor)
    );
}

#[test]
fn raw_whence_values() {
    assert_eq!(Whence::try_from(0i32), Ok(Whence::Set));
    assert_eq!(Whence::try_from(1i32), Ok(Whence::Cur));
    assert_eq!(Whence::try_from(2i32), Ok(Whence::End));
    assert_eq!(Whence::try_from(3i32), Err(Error::BadWhence));
    assert_eq!(Whence::try_from(-1i32), Err(Error::BadWhence));
}

#[test]
fn empty_write_moves_nothing() {
    let mut fs = formatted();
    let fd = fs.create("empty").unwrap();

    assert_eq!(fs.write(fd, &[]).unwrap(), 0);
    assert_eq!(fs.tell(fd).unwrap(), 0);
    assert_eq!(fs.size(fd).unwrap(), 0);
}

#[test]
fn empty_write_past_eof_extends_size() {
    let mut fs = formatted();
    let fd = fs.create("stretch").unwrap();
    fs.write(fd, &pattern(10)).unwrap();

    fs.seek(fd, 1000, Whence::Set).unwrap();
    assert_eq!(fs.write(fd, &[]).unwrap(), 0);
    assert_eq!(fs.size(fd).unwrap(), 1000);

    fs.seek(fd, 0, Whence::Set).unwrap();
    let mut buf = vec![0xff; 1000];
    assert_eq!(fs.read(fd, &mut buf).unwrap(), 1000);
    assert_eq!(&buf[..10], &pattern(10)[..]);
    assert!(buf[10..].iter().all(|&byte| byte == 0));

    fs.seek(fd, MAX_FILE_SIZE as i64, Whence::Set).unwrap();
    assert_eq!(fs.write(fd, &[]).unwrap(), 0);
    assert_eq!(fs.size(fd).unwrap(), MAX_FILE_SIZE);
}

#[test]
fn write_beyond_inode_reach_keeps_size() {
    let mut fs = formatted();
    let fd = fs.create("beyond").unwrap();
    fs.write(fd, &pattern(10)).unwrap();

    for cursor in [MAX_FILE_SIZE + 1, 2 * MAX_FILE_SIZE, (1 << 32) + 10] {
        fs.seek(fd, cursor as i64, Whence::Set).unwrap();
        assert_eq!(fs.write(fd, &[]), Err(Error::FileTooBig));
        assert_eq!(fs.write(fd, b"x"), Err(Error::FileTooBig));
        assert_eq!(fs.size(fd).unwrap(), 10);
        assert_eq!(fs.tell(fd).unwrap(), cursor);
    }

    // 起点合法、终点越界的写入整体失败，不留下部分内容
    fs.seek(fd, (MAX_FILE_SIZE - 1) as i64, Whence::Set).unwrap();
    assert_eq!(fs.write(fd, b"xy"), Err(Error::FileTooBig));
    assert_eq!(fs.size(fd).unwrap(), 10);
}

#[test]
fn seek_overflow_is_rejected() {
    let mut fs = formatted();
    let fd = fs.create("wrap").unwrap();

    fs.seek(fd, i64::MAX, Whence::Set).unwrap();
    fs.seek(fd, i64::MAX, Whence::Cur).unwrap();
    let cursor = fs.tell(fd).unwrap();

    assert_eq!(fs.seek(fd, i64::MAX, Whence::Cur), Err(Error::NegativeCursor));
    assert_eq!(fs.tell(fd).unwrap(), cursor);

    fs.seek(fd, 0, Whence::End).unwrap();
    assert_eq!(fs.tell(fd).unwrap(), 0);
}
